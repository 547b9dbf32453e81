//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Toon Catalog - browse animated series from the terminal
#[derive(Parser, Debug)]
#[command(name = "toon-catalog")]
#[command(author, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'V', long)]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every title in the catalog
    List,

    /// Show a title with its seasons and episodes
    Show {
        /// Catalog entry id
        #[arg(value_name = "ID")]
        id: String,

        /// Expand only this season
        #[arg(short, long)]
        season: Option<u32>,
    },

    /// Watch a title interactively
    Watch {
        /// Catalog entry id
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Resolve a path against the route table
    Route {
        /// Path such as /movie/42
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Sign in or create an account
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Read or write the chat
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },

    /// Increment the patch version in an env file
    BumpVersion {
        /// Path to the env file
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },

    /// Check catalog, identity service and storage
    Check,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List favorites
    List,

    /// Add a title to favorites
    Add {
        /// Catalog entry id
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Remove a title from favorites
    Remove {
        /// Catalog entry id
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Sign in to an existing account
    SignIn {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create a new account
    SignUp {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Display name for the profile
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChatAction {
    /// Show all messages
    List,

    /// Send a message
    Send {
        /// Message text
        #[arg(value_name = "TEXT")]
        text: String,

        /// Author name (defaults to the signed-in profile or the current user)
        #[arg(long)]
        author: Option<String>,
    },

    /// Delete all messages
    Clear {
        /// Clear password
        #[arg(long)]
        password: String,
    },
}
