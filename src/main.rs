use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use card_market::{config::Config, routes::create_router};

const DEFAULT_FILTER: &str = "card_market=debug,tower_http=debug,axum=debug";

#[derive(Parser)]
#[command(name = "card-market")]
#[command(about = "Trading card marketplace: storefront API and terminal client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the storefront HTTP API
    Serve {
        /// Overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Browse the catalog from the terminal
    Tui {
        /// Overrides STOREFRONT_URL
        #[arg(long)]
        api_url: Option<String>,

        /// Directory for the rolling log file
        #[arg(long, default_value = "logs")]
        log_dir: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Tui { api_url, log_dir } => {
            if let Some(api_url) = api_url {
                config.storefront.api_url = api_url;
            }

            // The screen belongs to the UI, so logs go to a daily file
            let file_appender = tracing_appender::rolling::daily(&log_dir, "card-market.log");
            let (writer, _guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "card_market=debug".into()),
                )
                .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
                .init();

            card_market::tui::run(config).await
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.require_database()?;
    info!("Configuration loaded: {:?}", config.server);

    // Connect to database
    let pool = card_market::db::create_pool(&config.database).await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    let state = card_market::AppState {
        pool,
        config: config.clone(),
        http: reqwest::Client::new(),
    };

    let app = create_router(state);

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
