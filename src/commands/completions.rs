//! Shell completions command

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::{QuireError, Result};

fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "elvish" => Ok(Shell::Elvish),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        "zsh" => Ok(Shell::Zsh),
        _ => Err(QuireError::UnsupportedShell {
            shell: name.to_string(),
        }),
    }
}

/// Generate shell completions
pub fn run(args: &CompletionsArgs) -> Result<()> {
    let shell = parse_shell(&args.shell)?;
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "quire", &mut std::io::stdout().lock());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert_eq!(parse_shell("bash").unwrap(), Shell::Bash);
        assert_eq!(parse_shell("Zsh").unwrap(), Shell::Zsh);
        assert_eq!(parse_shell("pwsh").unwrap(), Shell::PowerShell);
        assert_eq!(parse_shell("FISH").unwrap(), Shell::Fish);
    }

    #[test]
    fn test_unknown_shell() {
        let err = parse_shell("tcsh").unwrap_err();
        assert!(matches!(err, QuireError::UnsupportedShell { .. }));
    }

    #[test]
    fn test_completions_bash() {
        let args = CompletionsArgs {
            shell: "bash".to_string(),
        };
        assert!(run(&args).is_ok());
    }
}
