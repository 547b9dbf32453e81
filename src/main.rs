//! Toon Catalog CLI
//!
//! Browse an animated-series catalog, keep favorites and chat from the terminal.

use clap::Parser;
use toon_catalog::cli::{
    args::{AuthAction, ChatAction, Cli, Commands, FavoritesAction},
    commands::{auth, browse, chat, favorites, release, route, watch},
};
use toon_catalog::models::config::{self, Config};
use toon_catalog::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = config::load_config();

    if cli.version {
        println!("toon-catalog {}", config.app_version);
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("No command given. Run with --help to see available commands.");
    };

    // Run the appropriate command
    match command {
        Commands::List => {
            browse::list(&config).await?;
        }

        Commands::Show { id, season } => {
            browse::show(&config, &id, season).await?;
        }

        Commands::Watch { id } => {
            watch::watch(&config, &id).await?;
        }

        Commands::Route { path } => {
            route::route(&config, &path).await?;
        }

        Commands::Favorites { action } => match action {
            FavoritesAction::List => favorites::list(&config).await?,
            FavoritesAction::Add { id } => favorites::add(&config, &id).await?,
            FavoritesAction::Remove { id } => favorites::remove(&config, &id).await?,
        },

        Commands::Auth { action } => match action {
            AuthAction::SignIn { email, password } => {
                auth::sign_in(&config, &email, &password).await?;
            }
            AuthAction::SignUp { email, password, name } => {
                auth::sign_up(&config, &email, &password, name.as_deref()).await?;
            }
        },

        Commands::Chat { action } => match action {
            ChatAction::List => chat::list(&config).await?,
            ChatAction::Send { text, author } => {
                chat::send(&config, &text, author.as_deref()).await?;
            }
            ChatAction::Clear { password } => chat::clear(&config, &password).await?,
        },

        Commands::BumpVersion { env_file } => {
            release::bump_version(&env_file).await?;
        }

        Commands::Check => {
            run_preflight_checks(&config).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("toon_catalog=debug")
    } else {
        EnvFilter::new("toon_catalog=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and fail if any do.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
