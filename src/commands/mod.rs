//! Command implementations for Quire CLI

pub mod completions;
pub mod delete;
pub mod draft;
pub mod edit;
pub mod helpers;
pub mod index;
pub mod list;
pub mod login;
pub mod publish;
pub mod show;
pub mod version;

use crate::app::App;
use crate::cli::{Cli, Commands};
use crate::error::Result;

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.config;
    let app = || App::load(config.as_deref());

    match cli.command {
        Commands::Login(args) => login::login(&app()?, args).await,
        Commands::Logout => login::logout(&app()?),
        Commands::Whoami => login::whoami(&app()?).await,
        Commands::List => list::run(&app()?).await,
        Commands::Show(args) => show::run(&app()?, &args).await,
        Commands::Publish(args) => publish::run(&app()?, args).await,
        Commands::Edit(args) => edit::run(&app()?, &args).await,
        Commands::Delete(args) => delete::run(&app()?, &args).await,
        Commands::Draft(command) => draft::run(&app()?, command),
        Commands::Index(args) => index::run(&args),
        Commands::Version => version::run(),
        Commands::Completions(args) => completions::run(&args),
    }
}
