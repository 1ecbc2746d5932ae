// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use chapel_core::auth::password::{MIN_PASSWORD_LEN, hash_password};
use chapel_core::auth::queries;
use clap::Parser;
use cli::{Cli, Commands};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

mod cli;
mod logging;

const GENERATED_PASSWORD_LEN: usize = 20;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::CreateAdmin {
            username,
            email,
            password,
            db,
        } => {
            let username = username.trim().to_string();
            if username.is_empty() {
                return Err(Error::Custom("username must not be empty".into()));
            }
            if !email.contains('@') {
                return Err(Error::Custom(format!("'{email}' is not an email address")));
            }
            let (password, generated) = match password {
                Some(p) if p.len() < MIN_PASSWORD_LEN => {
                    return Err(Error::Custom(format!(
                        "password must be at least {MIN_PASSWORD_LEN} characters"
                    )));
                }
                Some(p) => (p, false),
                None => (generate_password(), true),
            };
            let hash = hash_password(&password)?;

            block_on(async {
                let pool = connect(&db.database_url).await?;
                chapel_core::migrate::migrate(&pool).await?;
                let admin = queries::create_admin(&pool, &username, &email, &hash).await?;
                log::info!("audit: created admin '{}' ({})", admin.username, admin.id);
                Ok::<_, Error>(())
            })?;

            if generated {
                println!("Generated password for '{username}': {password}");
            }
        }
        Commands::DisableAdmin { username, db } => set_active(&db.database_url, &username, false)?,
        Commands::EnableAdmin { username, db } => set_active(&db.database_url, &username, true)?,
    }

    Ok(())
}

fn set_active(database_url: &str, username: &str, is_active: bool) -> Result<()> {
    block_on(async {
        let pool = connect(database_url).await?;
        if !queries::set_admin_active(&pool, username, is_active).await? {
            return Err(Error::Custom(format!("no admin named '{username}'")));
        }
        let action = if is_active { "enabled" } else { "disabled" };
        log::info!("audit: {action} admin '{username}'");
        Ok(())
    })
}

fn generate_password() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

async fn connect(database_url: &str) -> Result<PgPool> {
    Ok(PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(database_url)
        .await?)
}

fn block_on<F: std::future::Future<Output = Result<()>>>(fut: F) -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(fut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_are_long_enough_and_distinct() {
        let a = generate_password();
        let b = generate_password();
        assert_eq!(a.len(), GENERATED_PASSWORD_LEN);
        assert!(a.len() >= MIN_PASSWORD_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
