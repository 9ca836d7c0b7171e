use clap::Parser;
use dotenv::dotenv;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tooldex::db::schema;
use tooldex::server::config::ServerConfig;
use tooldex::version::VERSION;
use tooldex::web::create_axum_router;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Default to `info` with the ORM chatter quieted if RUST_LOG is not set.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Manually check for --version before full parsing to keep the output simple.
    if std::env::args().any(|arg| arg == "--version") {
        println!("Server version: {VERSION}");
        return Ok(());
    }

    let args = Args::parse();

    init_logging();
    info!("Starting tooldex server, version: {}", VERSION);
    dotenv().ok();

    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load server configuration: {}", e);
            return Err(e.into());
        }
    };

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env file");
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(10);

    let db_pool: DatabaseConnection = Database::connect(opt)
        .await
        .expect("Failed to create database connection.");

    schema::bootstrap(&db_pool).await?;

    let app = create_axum_router(db_pool, server_config.clone());

    let addr: SocketAddr = server_config.listen_addr.parse()?;
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4()?
    } else {
        tokio::net::TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.set_keepalive(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(1024)?;
    info!(address = %addr, "HTTP server listening");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
