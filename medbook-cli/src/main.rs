mod check;
mod handlers;
mod server;


use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "medbook",
    about = "Medbook — double-booking-free scheduling for doctors, patients and rooms",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Medbook HTTP booking server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "MEDBOOK_PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0", env = "MEDBOOK_HOST")]
        host: String,

        /// Storage backend: "memory" or "sqlite:<path>"
        #[arg(long, default_value = "memory", env = "MEDBOOK_STORAGE")]
        storage: String,
    },

    /// Check a proposed booking against existing ones from a JSON document (stdin)
    Check,

    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, storage } => {
            if let Err(e) = server::run(&host, port, &storage).await {
                tracing::error!(error = %e, "Server error");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Commands::Check => {
            eprintln!("Reading booking proposal from stdin...");
            let mut input = String::new();
            if let Err(e) = std::io::Read::read_to_string(&mut std::io::stdin(), &mut input) {
                eprintln!("Failed to read stdin: {}", e);
                return ExitCode::FAILURE;
            }

            let verdict = match check::check_json(&input) {
                Ok(verdict) => verdict,
                Err(e) => {
                    eprintln!("Invalid JSON document: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            match serde_json::to_string_pretty(&verdict) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Failed to encode verdict: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            if verdict.admissible {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Version => {
            println!("medbook {}", env!("CARGO_PKG_VERSION"));
            println!("Conflict-free booking for doctors, patients and rooms");
            ExitCode::SUCCESS
        }
    }
}
