use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chapel", version, about = "Chapel offline admin tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct Database {
    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/chapel"
    )]
    pub database_url: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,

    /// Create an admin account. Without a password one is generated and printed once.
    CreateAdmin {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "CHAPEL_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[command(flatten)]
        db: Database,
    },

    /// Disable an admin. Outstanding tokens stop working on their next use.
    DisableAdmin {
        #[arg(long)]
        username: String,

        #[command(flatten)]
        db: Database,
    },

    /// Re-enable a disabled admin.
    EnableAdmin {
        #[arg(long)]
        username: String,

        #[command(flatten)]
        db: Database,
    },
}
