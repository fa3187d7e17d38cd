//! GoBarber CLI - sign in, manage your profile and recover your password
//! from the terminal.

mod commands;
mod prompt;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gobarber_core::account::AccountError;

#[derive(Parser)]
#[command(name = "gobarber", about = "GoBarber client", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        /// Account email (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update name, email and optionally password
    Profile {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// Prompt for the current and a new password
        #[arg(long)]
        change_password: bool,
    },
    /// Upload a new avatar image
    Avatar {
        /// Image file to upload
        path: PathBuf,
    },
    /// Email password recovery instructions
    ForgotPassword {
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password using the link from the recovery email
    ResetPassword {
        /// Recovery link, `?token=...` query or bare token
        link: String,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// The returned guard flushes buffered log lines when dropped.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();
    guard
}

fn report(err: &anyhow::Error) {
    if let Some(AccountError::Validation(errors)) = err.downcast_ref::<AccountError>() {
        eprintln!("Please fix the following:");
        for (field, message) in errors.iter() {
            eprintln!("  {}: {}", field, message);
        }
    } else {
        eprintln!("Error: {:#}", err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email } => commands::login(email).await,
        Commands::Logout => commands::logout(),
        Commands::Whoami => commands::whoami(),
        Commands::Profile {
            name,
            email,
            change_password,
        } => commands::profile(name, email, change_password).await,
        Commands::Avatar { path } => commands::avatar(&path).await,
        Commands::ForgotPassword { email } => commands::forgot_password(email).await,
        Commands::ResetPassword { link } => commands::reset_password(&link).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing();
    info!("GoBarber CLI starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_profile_flags() {
        let cli = Cli::try_parse_from([
            "gobarber",
            "profile",
            "--name",
            "New Name",
            "--change-password",
        ])
        .expect("parse args");
        match cli.command {
            Commands::Profile {
                name,
                email,
                change_password,
            } => {
                assert_eq!(name.as_deref(), Some("New Name"));
                assert_eq!(email, None);
                assert!(change_password);
            }
            _ => panic!("expected profile command"),
        }
    }

    #[test]
    fn test_parse_reset_password_link() {
        let cli = Cli::try_parse_from([
            "gobarber",
            "reset-password",
            "http://localhost:3000/reset-password?token=abc",
        ])
        .expect("parse args");
        assert!(matches!(cli.command, Commands::ResetPassword { .. }));
    }
}
