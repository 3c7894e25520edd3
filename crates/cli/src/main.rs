//! Apotheca CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! apotheca-cli migrate
//!
//! # Seed the catalog with starter products
//! apotheca-cli seed
//!
//! # Create a staff account
//! apotheca-cli user create -e admin@pharmacy.example -n "Admin" -r Admin \
//!     -p "change-me-now" -c "+233201234567"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "apotheca-cli")]
#[command(author, version, about = "Apotheca CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with starter products
    Seed,
    /// Manage staff accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new staff account
    Create {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`Admin`, `Pharmacist`, `Cashier`)
        #[arg(short, long, default_value = "Admin")]
        role: String,

        /// Login password
        #[arg(short, long)]
        password: String,

        /// Contact phone number
        #[arg(short, long)]
        contact: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::products().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                password,
                contact,
            } => {
                commands::users::create(&email, &name, &role, &password, &contact).await?;
            }
        },
    }
    Ok(())
}
