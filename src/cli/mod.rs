pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sanatorium")]
#[command(about = "Sanatorium API administration")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List the permission vocabulary roles are built from")]
    Permissions,

    #[command(about = "Describe the searchable listings and their query parameters")]
    Listings,

    #[command(about = "Hash a password for seeding the users table")]
    HashPassword {
        #[arg(help = "Plain-text password")]
        password: String,
    },

    #[command(about = "Issue a bearer token with the configured secret")]
    Token {
        #[arg(long, help = "User id (token subject)")]
        user_id: i64,
        #[arg(long, help = "Role id recorded in the token")]
        role_id: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Permissions => commands::permissions::handle(output_format),
        Commands::Listings => commands::listings::handle(output_format),
        Commands::HashPassword { password } => commands::password::handle(&password, output_format),
        Commands::Token { user_id, role_id } => commands::token::handle(user_id, role_id, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_command() {
        let cli = Cli::try_parse_from(["sanatorium", "token", "--user-id", "1", "--role-id", "2", "--json"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Token { user_id: 1, role_id: 2 }));
    }

    #[test]
    fn parses_hash_password_command() {
        let cli = Cli::try_parse_from(["sanatorium", "hash-password", "s3cret-pass"]).unwrap();
        assert!(matches!(cli.command, Commands::HashPassword { ref password } if password == "s3cret-pass"));
    }
}
