use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use huayang_core::{FileSlot, VolumeStore};
use huayang_server::{routes, AppState, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("huayang-server")
        .version(huayang_server::VERSION)
        .about("Huayang county gazetteer: reader and editor")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .env("HUAYANG_CONFIG")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .env("HUAYANG_BIND")
                .global(true)
                .value_parser(value_parser!(SocketAddr))
                .help("Listen address"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .env("HUAYANG_DATA_DIR")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the volume data"),
        )
        .arg(
            Arg::new("admin-user")
                .long("admin-user")
                .env("HUAYANG_ADMIN_USER")
                .global(true)
                .help("Editor login name"),
        )
        .arg(
            Arg::new("admin-password")
                .long("admin-password")
                .env("HUAYANG_ADMIN_PASSWORD")
                .hide_env_values(true)
                .global(true)
                .help("Editor password; logins are refused without one"),
        )
        .arg(
            Arg::new("gemini-api-key")
                .long("gemini-api-key")
                .env("GEMINI_API_KEY")
                .hide_env_values(true)
                .global(true)
                .help("Gemini API key; AI drafting is disabled without one"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Emit logs as JSON"),
        )
        .subcommand(Command::new("serve").about("Run the HTTP server (default)"))
        .subcommand(Command::new("export").about("Print the volume collection as JSON"))
        .subcommand(Command::new("reset").about("Replace all volumes with the seed set"))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

async fn load_config(args: &ArgMatches) -> anyhow::Result<ServerConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::load(path).await?,
        None => ServerConfig::new(),
    };
    if let Some(bind) = args.get_one::<SocketAddr>("bind") {
        config = config.with_bind(*bind);
    }
    if let Some(dir) = args.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir.clone());
    }
    if let Some(user) = args.get_one::<String>("admin-user") {
        config = config.with_admin_user(user.clone());
    }
    if let Some(password) = args.get_one::<String>("admin-password") {
        config = config.with_admin_password(password.clone());
    }
    if let Some(key) = args.get_one::<String>("gemini-api-key") {
        config = config.with_api_key(key.clone());
    }
    Ok(config)
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<VolumeStore> {
    let slot = Arc::new(FileSlot::new(config.data_dir.clone()));
    VolumeStore::open(slot, config.recovery)
        .await
        .with_context(|| format!("opening volume store in {}", config.data_dir.display()))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config).await?;
    let store = Arc::clone(&state.store);

    let (addr, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(config.bind, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!(%addr, data_dir = %config.data_dir.display(), "huayang server listening");

    server.await;
    tracing::info!("shutting down");
    store.close().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let (name, args) = match matches.subcommand() {
        Some((name, args)) => (name, args),
        None => ("serve", &matches),
    };
    init_tracing(args.get_flag("json-logs"));
    let config = load_config(args).await?;

    match name {
        "export" => {
            let store = open_store(&config).await?;
            println!("{}", serde_json::to_string_pretty(&store.list().await)?);
        }
        "reset" => {
            let store = open_store(&config).await?;
            store.reset_to_seed().await?;
            store.close().await?;
            println!("Reset {} volumes in {}", store.len().await, config.data_dir.display());
        }
        _ => serve(config).await?,
    }
    Ok(())
}
