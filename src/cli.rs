//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Quire - Markdown blog publisher
///
/// Publish and manage Markdown blog posts stored in a GitHub repository.
#[derive(Parser, Debug)]
#[command(
    name = "quire",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Publish Markdown blog posts to a GitHub repository",
    long_about = "Quire publishes Markdown posts with frontmatter to the blog directory \
                  of a GitHub repository. Publishing and deleting require write access to the \
                  repository; listing and reading only need a valid token.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  quire login --token ghp_xxx\n    \
                  quire list\n    \
                  quire publish --title \"Hello World\" --file post.md\n    \
                  quire edit 2024-01-15-hello-world.md\n    \
                  quire delete 2024-01-15-hello-world.md"
)]
pub struct Cli {
    /// Config file (defaults to ./quire.yaml when present)
    #[arg(long, short = 'c', global = true, env = "QUIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate and store a GitHub token
    Login(LoginArgs),

    /// Forget the stored token
    Logout,

    /// Show the logged-in account and its access
    Whoami,

    /// List published posts
    List,

    /// Print a published post
    Show(ShowArgs),

    /// Publish a new post, or the post loaded into the draft
    Publish(PublishArgs),

    /// Load a published post into the draft for editing
    Edit(EditArgs),

    /// Delete a published post
    Delete(DeleteArgs),

    /// Manage the local draft
    #[command(subcommand)]
    Draft(DraftCommand),

    /// Generate index.json for a local posts directory
    Index(IndexArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// What the command does, for status messages ("Failed to <action>")
    pub fn action(&self) -> &'static str {
        match self {
            Commands::Login(_) => "log in",
            Commands::Logout => "log out",
            Commands::Whoami => "check login",
            Commands::List => "load posts",
            Commands::Show(_) | Commands::Edit(_) => "load post",
            Commands::Publish(_) => "publish post",
            Commands::Delete(_) => "delete post",
            Commands::Draft(_) => "update draft",
            Commands::Index(_) => "generate index",
            Commands::Version => "show version",
            Commands::Completions(_) => "generate completions",
        }
    }
}

/// Arguments for the login command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Log in with a token:\n    quire login --token ghp_xxx\n\n\
                  Log in from the environment:\n    GITHUB_TOKEN=ghp_xxx quire login")]
pub struct LoginArgs {
    /// GitHub Personal Access Token (prompted for when omitted)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Post filename, e.g. 2024-01-15-hello-world.md
    pub name: String,
}

/// Post fields shared by `publish` and `draft save`
#[derive(Args, Debug, Default)]
pub struct PostFields {
    /// Post title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Markdown file holding the post body
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Filename to publish as (derived from the date and title by default)
    #[arg(long)]
    pub filename: Option<String>,

    /// Genre (defaults to tech)
    #[arg(long, short = 'g')]
    pub genre: Option<String>,

    /// Short summary shown in post lists
    #[arg(long, short = 'e')]
    pub excerpt: Option<String>,
}

/// Arguments for the publish command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Publish a new post:\n    quire publish --title \"Hello World\" --file post.md\n\n\
                  Publish with a custom filename:\n    quire publish -t \"Hello\" -f post.md --filename hello.md\n\n\
                  Publish the draft (e.g. after quire edit):\n    quire publish --from-draft")]
pub struct PublishArgs {
    #[command(flatten)]
    pub fields: PostFields,

    /// Start from the saved draft; other flags override its fields
    #[arg(long)]
    pub from_draft: bool,

    /// Commit message
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

/// Arguments for the edit command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Load a post and write its body for editing:\n    quire edit 2024-01-15-hello.md --output hello.md\n\n\
                  Then update the draft and publish:\n    quire draft save --file hello.md\n    quire publish --from-draft")]
pub struct EditArgs {
    /// Post filename
    pub name: String,

    /// Also write the post body to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the delete command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Delete a post:\n    quire delete 2024-01-15-hello.md\n\n\
                  Delete without confirmation:\n    quire delete 2024-01-15-hello.md -y")]
pub struct DeleteArgs {
    /// Post filename
    pub name: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Commit message
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum DraftCommand {
    /// Save fields into the draft, keeping fields not given
    Save(PostFields),

    /// Print the draft
    Show,

    /// Discard the draft
    Clear,
}

/// Arguments for the index command
#[derive(Parser, Debug)]
pub struct IndexArgs {
    /// Directory holding the .md posts
    pub dir: PathBuf,

    /// Output path (defaults to <dir>/index.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    quire completions --shell bash > ~/.bash_completion.d/quire\n\n\
                  Generate zsh completions:\n    quire completions --shell zsh > ~/.zfunc/_quire\n\n\
                  Generate fish completions:\n    quire completions --shell fish > ~/.config/fish/completions/quire.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
