use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, AppConfigProvider, CliArgs, ConfigProvider};
use std::path::{Path, PathBuf};

use contacts::{config::ContactsConfig, Contacts};

mod db;
mod server;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// CRM server - contact records over HTTP
#[derive(Parser)]
#[command(name = "crm-server")]
#[command(about = "CRM server - contact records over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep contacts in memory instead of the configured database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("CRM server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config),
    }
}

async fn build_contacts(config: &AppConfig, args: &CliArgs) -> Result<Contacts> {
    let provider = AppConfigProvider::new(config.clone());
    let contacts_cfg = ContactsConfig::from_value(provider.get_module_config("contacts"))?;

    if args.mock {
        tracing::info!("--mock given; contacts are kept in memory");
        return Ok(Contacts::in_memory(contacts_cfg));
    }

    match &config.database {
        Some(db_config) => {
            let conn = db::connect(db_config, Path::new(&config.server.home_dir)).await?;
            Contacts::with_database(conn, contacts_cfg).await
        }
        None => {
            tracing::warn!("No database configuration found; contacts are kept in memory");
            Ok(Contacts::in_memory(contacts_cfg))
        }
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let contacts = build_contacts(&config, &args).await?;
    let router = server::build_router(&contacts);
    server::serve(router, &config.server.host, config.server.port).await
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    ContactsConfig::from_value(config.module_config("contacts"))?;
    if let Some(db_config) = &config.database {
        db::check_backend(db_config)?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}
