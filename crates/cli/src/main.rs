use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstore_app::modules::books::store::BookStore;
use bookstore_kernel::settings::Settings;

/// Operate the bookstore inventory service.
#[derive(Debug, Parser)]
#[command(name = "bookstore-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Check that the configured book store is reachable
    Ping,
    /// Print the effective settings as JSON
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookstore_app::run(settings).await
        }
        Command::Ping => {
            let store = bookstore_app::connect_store(&settings).await?;
            match store.ping().await {
                Ok(()) => {
                    println!("book store reachable");
                    Ok(())
                }
                Err(err) => {
                    eprintln!("book store unreachable: {err:#}");
                    std::process::exit(1);
                }
            }
        }
        Command::Settings => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
