//! Route inspection CLI.
//!
//! Loads a route configuration, publishes it into a fresh store and answers
//! lookups against it the way a dispatching host would.

use std::path::PathBuf;
use clap::{Parser, Subcommand};

use site_router::config::loader::load_config;
use site_router::config::watcher::ConfigWatcher;
use site_router::lifecycle;
use site_router::observability::logging::init_logging;
use site_router::registrar::Site;

#[derive(Parser)]
#[command(name = "site-router")]
#[command(about = "Resolve and inspect multi-tenant page routes", long_about = None)]
struct Cli {
    /// Route configuration file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print a summary
    Check,
    /// Resolve a request path for a site
    Resolve {
        #[arg(short, long)]
        site: String,
        path: String,
    },
    /// Print stored routes, optionally for one site
    Dump {
        #[arg(short, long)]
        site: Option<String>,
    },
    /// Print the URL of a site asset
    AssetUrl {
        #[arg(short, long)]
        site: String,
        file: String,
    },
    /// Keep republishing routes as the configuration file changes
    Watch,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability.log_level);

    tracing::info!(
        path = %cli.config.display(),
        sites = config.sites.len(),
        routes = config.routes.len(),
        "Configuration loaded"
    );

    let store = lifecycle::init()?;
    let runtime = lifecycle::bootstrap(store, &config)?;

    match cli.command {
        Commands::Check => {
            let (static_routes, dynamic_routes) = config
                .routes
                .iter()
                .filter_map(|route| route.pattern().ok())
                .fold((0, 0), |(s, d), pattern| {
                    if pattern.is_static() { (s + 1, d) } else { (s, d + 1) }
                });
            println!(
                "ok: {} site(s), {} route(s) ({} static, {} dynamic), batch size {}",
                runtime.sites.len(),
                runtime.store.len(),
                static_routes,
                dynamic_routes,
                runtime.matcher.batch_size()
            );
            for site in runtime.sites.sites() {
                println!("  {}: {} route(s)", site, runtime.store.dump_for_site(&site).len());
            }
        }
        Commands::Resolve { site, path } => match runtime.resolve_path(&site, &path) {
            Some(resolved) => println!("{}", serde_json::to_string_pretty(&resolved)?),
            None => {
                eprintln!("not found: {} {}", site, path);
                std::process::exit(1);
            }
        },
        Commands::Dump { site } => {
            let entries = match site {
                Some(site) => runtime.store.dump_for_site(&Site::new(site)?),
                None => runtime.store.dump_all(),
            };
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Commands::AssetUrl { site, file } => {
            let site = Site::new(site)?;
            println!("{}", runtime.sites.asset_url(&site, &file)?);
        }
        Commands::Watch => {
            let _watcher = ConfigWatcher::new(&cli.config, runtime.reloader.clone()).run()?;
            tracing::info!("Watching for changes, press Ctrl-C to exit");
            loop {
                std::thread::park();
            }
        }
    }

    Ok(())
}
