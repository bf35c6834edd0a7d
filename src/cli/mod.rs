//! CLI module for the User Records API
//!
//! Provides subcommands for:
//! - `serve`: run the HTTP API
//! - `migrate`: apply or revert the PostgreSQL schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// User Records API - REST service for user records
#[derive(Parser)]
#[command(name = "user-records-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve(serve::ServeArgs),

    /// Apply (or revert) database migrations and exit
    Migrate(migrate::MigrateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "user-records-api",
            "serve",
            "--port",
            "8081",
            "--database-url",
            "postgres://db/users",
        ])
        .unwrap();

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(8081));
                assert_eq!(args.database_url.as_deref(), Some("postgres://db/users"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["user-records-api", "serve"]).unwrap();

        match cli.command {
            Command::Serve(args) => {
                assert!(args.port.is_none());
                assert!(args.database_url.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["user-records-api", "migrate", "--revert"]).unwrap();

        match cli.command {
            Command::Migrate(args) => assert!(args.revert),
            _ => panic!("expected migrate"),
        }
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["user-records-api", "ui"]).is_err());
    }
}
