use clap::{Parser, Subcommand};
use lib::channels::{MessengerChannel, OutboundMessage};

#[derive(Parser)]
#[command(name = "pagebot")]
#[command(about = "Messenger webhook bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config.json.
    Init {
        /// Config file path (default: PAGEBOT_CONFIG_PATH or ~/.pagebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook server. Requires a page access token (PAGE_ACCESS_TOKEN or messenger.pageAccessToken).
    Serve {
        /// Config file path (default: PAGEBOT_CONFIG_PATH or ~/.pagebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 8000)
        #[arg(long, short)]
        port: Option<u16>,

        /// Bind address (default from config or 0.0.0.0)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Send one text message to a user through the Send API.
    Send {
        /// Config file path (default: PAGEBOT_CONFIG_PATH or ~/.pagebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Recipient page-scoped id.
        #[arg(long, value_name = "ID")]
        psid: String,

        /// Message text.
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("pagebot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { config, port, bind }) => {
            if let Err(e) = run_serve(config, port, bind).await {
                log::error!("serve failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Send { config, psid, text }) => {
            if let Err(e) = run_send(config, &psid, text).await {
                log::error!("send failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let dir = lib::config::init_config_file(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
    bind: Option<String>,
) -> anyhow::Result<()> {
    let (mut config, path) = lib::config::load_config(config_path)?;
    log::debug!("using config {}", path.display());
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(b) = bind {
        config.server.bind = b;
    }
    log::info!("starting gateway on {}:{}", config.server.bind, config.server.port);
    lib::gateway::run_gateway(config).await
}

async fn run_send(
    config_path: Option<std::path::PathBuf>,
    psid: &str,
    text: String,
) -> anyhow::Result<()> {
    let (config, _) = lib::config::load_config(config_path)?;
    let token = lib::config::resolve_page_access_token(&config).ok_or_else(|| {
        anyhow::anyhow!(
            "page access token not configured (set PAGE_ACCESS_TOKEN or messenger.pageAccessToken)"
        )
    })?;
    let channel = MessengerChannel::new(&config.messenger, token);
    channel
        .send_message(psid, &OutboundMessage::text(text))
        .await?;
    println!("message sent to {}", psid);
    Ok(())
}
