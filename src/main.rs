use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docforge::{api, config::Config, workspace::Workspace};

#[derive(Parser)]
#[command(name = "docforge")]
#[command(about = "Markdown documentation editor service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the docforge server
    Serve {
        /// Port for the HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "docforge=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(Commands::Serve { port: Some(port) }) = cli.command {
        config.port = port;
    }

    tracing::info!(
        "starting docforge for docs at {}",
        config.docs_dir.display()
    );

    let addr = format!("{}:{}", config.host, config.port);
    let workspace = Workspace::open(config)?;
    let app = api::create_router(workspace);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("docforge listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
