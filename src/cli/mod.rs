//! CLI interface for tutorlink

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tutorlink")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "Sign in to tutorlink and check what your role can open", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new tutorlink.toml configuration file
    Init,

    /// Start the reference auth backend
    Serve {
        /// Host to bind to (defaults to server.host from the config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long, env = "TUTORLINK_PASSWORD")]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        /// Full name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long, env = "TUTORLINK_PASSWORD")]
        password: Option<String>,

        /// "I want to learn", "I want to teach" or "Both Learn and Teach"
        #[arg(short, long, default_value = "I want to learn")]
        role: String,

        /// Subject you learn or teach (repeatable)
        #[arg(short, long = "subject")]
        subjects: Vec<String>,

        #[arg(short, long, default_value = "")]
        bio: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Check whether the signed-in user may open a page
    Access {
        /// Route keys guarding the page; any one of them is enough.
        /// With none given, only a signed-in session is required.
        routes: Vec<String>,

        /// Require the admin role instead of route keys
        #[arg(long, conflicts_with = "routes")]
        admin: bool,
    },

    /// Show which routes each role may open
    Routes {
        /// Limit the table to one role
        #[arg(short, long)]
        role: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
