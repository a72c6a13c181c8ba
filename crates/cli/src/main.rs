//! Lumen CLI - database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! lumen migrate
//!
//! # Give an account that signed up through the admin access to it
//! lumen account grant -e editor@lumen.studio
//!
//! # Take access away again (also signs the account out everywhere)
//! lumen account revoke -e editor@lumen.studio
//!
//! # Sign an account out of every session without changing its role
//! lumen account sign-out -e editor@lumen.studio
//!
//! # List accounts and roles
//! lumen account list
//! ```
//!
//! Every command reads `ADMIN_DATABASE_URL` (falling back to
//! `DATABASE_URL`), from a `.env` file if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about = "Lumen operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Grant the admin role
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Demote to member and end all sessions
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// End all sessions, keeping the role
    SignOut {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// List accounts with their roles
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let pool = commands::connect().await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await?,
        Commands::Account { action } => {
            let store = lumen_core::postgres::PgStore::new(pool);
            match action {
                AccountAction::Grant { email } => {
                    commands::account::grant(&store, &email).await?;
                }
                AccountAction::Revoke { email } => {
                    commands::account::revoke(&store, &email).await?;
                }
                AccountAction::SignOut { email } => {
                    commands::account::sign_out(&store, &email).await?;
                }
                AccountAction::List => {
                    commands::account::list(&store).await?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_account_grant() {
        let cli = Cli::try_parse_from(["lumen", "account", "grant", "-e", "a@lumen.studio"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Account {
                action: AccountAction::Grant { email }
            } if email == "a@lumen.studio"
        ));
    }

    #[test]
    fn test_sign_out_is_kebab_case() {
        let cli =
            Cli::try_parse_from(["lumen", "account", "sign-out", "--email", "a@lumen.studio"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Account {
                action: AccountAction::SignOut { .. }
            }
        ));
    }

    #[test]
    fn test_grant_requires_email() {
        assert!(Cli::try_parse_from(["lumen", "account", "grant"]).is_err());
    }
}
