//! Authentication commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::Credentials;
use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Authentication commands.
#[derive(Debug, Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Save a board API key and token.
    Login(LoginArgs),

    /// Delete saved credentials.
    Logout,

    /// Show current authentication status.
    Status,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Board API key.
    #[arg(long, env = "WJ_API_KEY")]
    key: String,

    /// Board API token.
    #[arg(long, env = "WJ_API_TOKEN")]
    token: String,
}

impl AuthCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            AuthSubcommand::Login(args) => login(ctx, args).await,
            AuthSubcommand::Logout => logout(ctx).await,
            AuthSubcommand::Status => status(ctx).await,
        }
    }
}

/// Save credentials for the board API.
async fn login(_ctx: CommandContext, args: LoginArgs) -> Result<()> {
    let key = args.key.trim().to_string();
    let token = args.token.trim().to_string();
    if key.is_empty() || token.is_empty() {
        anyhow::bail!("Key and token cannot be empty");
    }

    Credentials::new(key, token).save()?;

    print_success("Credentials saved. Checklist linking will use the board API.");
    Ok(())
}

/// Delete saved credentials.
async fn logout(_ctx: CommandContext) -> Result<()> {
    Credentials::delete()?;
    print_success("Logged out successfully.");
    Ok(())
}

/// Show authentication status.
async fn status(ctx: CommandContext) -> Result<()> {
    if let OutputFormat::Json = ctx.format {
        let payload = match &ctx.credentials {
            Some(creds) => serde_json::json!({
                "authenticated": true,
                "key": creds.masked_key(),
                "authorized_at": creds.authorized_at,
            }),
            None => serde_json::json!({ "authenticated": false }),
        };
        print_single(&payload, ctx.format);
        return Ok(());
    }

    match ctx.credentials {
        Some(creds) => {
            println!("{} Authenticated", "Status:".green().bold());
            println!("  Key: {}", creds.masked_key());

            if let Some(authorized_at) = creds.authorized_at {
                println!("  Authorized: {}", authorized_at.to_rfc3339());
            }
        }
        None => {
            println!("{} Not authenticated", "Status:".red().bold());
            println!("\nRun {} to store credentials.", "wj auth login".cyan());
        }
    }

    Ok(())
}
