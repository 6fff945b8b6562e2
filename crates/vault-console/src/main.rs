//! Vault Console - command-line driver for the admin console session.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vault_console::{
    Config, Console, FileStorage, KeyValueStorage, MemoryStorage, NavigationOutcome,
};

/// Vault Console - admin console session client
#[derive(Parser, Debug)]
#[command(name = "vault-console")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Backend URL (overrides config file and VAULT_CONSOLE_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Session storage file
    #[arg(long, global = true, conflicts_with = "ephemeral")]
    storage: Option<PathBuf>,

    /// Keep the session in memory only for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in with an email or username
    Login {
        /// Email or username
        identity: String,
        /// Account password
        #[arg(long, env = "VAULT_CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and forget the stored session
    Logout,

    /// Show the current session
    Status,

    /// Navigate to a console location and show where it lands
    Open {
        /// Location, e.g. `/collections/posts`
        path: String,
    },

    /// List collections (requires a session)
    Collections,

    /// Save `--server` and `--storage` to the config file
    Configure,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("vault_console={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Commands::Configure) {
        return configure(cli.server, cli.storage);
    }

    let mut config = Config::load();
    if let Some(url) = cli.server {
        config.server_url = url;
    }
    if let Some(path) = cli.storage {
        config.storage_path = Some(path);
    }

    let storage: Arc<dyn KeyValueStorage> = if cli.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        let session_path = config
            .session_path()
            .context("could not determine data directory; pass --storage")?;
        Arc::new(FileStorage::new(session_path))
    };
    let mut console = Console::bootstrap(&config, storage, "/")?;

    match cli.command {
        Commands::Login { identity, password } => {
            if !console.login(&identity, &password).await {
                bail!("login failed for '{identity}'");
            }
            let user = console.session().identity().unwrap_or_default();
            println!("Logged in as {}", user.display_name());
        }
        Commands::Logout => {
            console.logout();
            println!("Logged out");
        }
        Commands::Status => match console.session().identity() {
            Some(user) => {
                println!("Server:  {}", config.server_url);
                println!("User:    {}", user.display_name());
                if let Some(id) = user.id() {
                    println!("User ID: {id}");
                }
            }
            None => {
                println!("Server:  {}", config.server_url);
                println!("Not logged in");
            }
        },
        Commands::Open { path } => match console.navigate(&path) {
            NavigationOutcome::Entered(loc) => {
                println!("{} -> {} ({:?})", path, loc.name, loc.view);
            }
            NavigationOutcome::Redirected { requested, to } => {
                println!("{path} -> {requested} redirected to {} ({})", to.name, to.path);
            }
            NavigationOutcome::NotFound(_) => bail!("no route matches '{path}'"),
        },
        Commands::Collections => {
            if !console.session().is_authenticated() {
                bail!("not logged in; run `vault-console login` first");
            }
            let collections = console
                .client()
                .list_collections()
                .await
                .context("failed to list collections")?;
            for collection in collections {
                println!(
                    "{}\t{}",
                    collection.name,
                    collection.kind.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Configure => unreachable!("handled before bootstrap"),
    }

    Ok(())
}

fn configure(server: Option<String>, storage: Option<PathBuf>) -> anyhow::Result<()> {
    if server.is_none() && storage.is_none() {
        bail!("nothing to save; pass --server and/or --storage");
    }
    let config = Config::update(|c| {
        if let Some(url) = server {
            c.server_url = url;
        }
        if let Some(path) = storage {
            c.storage_path = Some(path);
        }
    })
    .context("failed to save configuration")?;

    println!("Server:  {}", config.server_url);
    if let Some(path) = &config.storage_path {
        println!("Storage: {}", path.display());
    }
    Ok(())
}
