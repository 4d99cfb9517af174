use clap::Parser;
use log::info;
use ming::{DefaultAccess, MingHttpServer, ServerConfig};
use std::fs;
use std::path::PathBuf;

/// Command line options for the Ming server binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Port for the HTTP server
    #[arg(long, default_value_t = 27080)]
    port: u16,
    /// Host the HTTP server binds to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Directory for the embedded database
    #[arg(long)]
    storage_path: Option<PathBuf>,
    /// Policy applied when no permission record covers an operation
    #[arg(long, value_enum)]
    default_permissions: Option<DefaultAccess>,
}

/// Main entry point for the Ming server.
///
/// Loads configuration, opens the store, and runs the HTTP server. The
/// configuration file is optional; command-line options override it.
///
/// # Environment Variables
///
/// * `MING_CONFIG` - Path to the server configuration file
///   (default: config/ming.json)
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    // Read server config from environment variable or default path, falling
    // back to defaults when the file does not exist.
    let config_path =
        std::env::var("MING_CONFIG").unwrap_or_else(|_| "config/ming.json".to_string());
    let mut config: ServerConfig = if let Ok(config_str) = fs::read_to_string(&config_path) {
        info!("Loading config from: {}", config_path);
        serde_json::from_str(&config_str)?
    } else {
        ServerConfig::default()
    };

    // Command-line options win over the file.
    config.bind_address = format!("{}:{}", cli.host, cli.port);
    if let Some(path) = cli.storage_path {
        config.storage_path = path;
    }
    if let Some(access) = cli.default_permissions {
        config.default_access = access;
    }

    info!("Storing data in {}", config.storage_path.display());
    let server = MingHttpServer::new(&config)?;
    server.run().await?;

    Ok(())
}
