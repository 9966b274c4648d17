//! Index command implementation

use crate::cli::IndexArgs;
use crate::error::Result;
use crate::index::write_index;
use crate::status::StatusMessage;

/// Write index.json for a local posts directory
pub fn run(args: &IndexArgs) -> Result<()> {
    let (path, count) = write_index(&args.dir, args.output.as_deref())?;
    StatusMessage::success(format!("Wrote {count} posts to {}", path.display())).print();
    Ok(())
}
