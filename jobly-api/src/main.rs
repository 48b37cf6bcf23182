use dotenvy::dotenv;

use clap::{Parser, command};
use jobly_database::JoblyDatabase;
use tracing_subscriber::EnvFilter;

use crate::server::App;

pub mod common;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod token;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server address
    #[arg(long, env = "JOBLY_SERVER_ADDRESS")]
    address: String,

    #[arg(long, env = "JOBLY_DATABASE_URL")]
    database_url: String,

    /// HS256 signing key for auth tokens
    #[arg(long, env = "JOBLY_SECRET_KEY")]
    secret_key: String,

    #[arg(long, env = "JOBLY_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    let pool = match JoblyDatabase::connect(&args.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Could not connect with database: {}", e);
            return;
        }
    };

    let app = App::new(pool, args.secret_key);

    match tokio::net::TcpListener::bind(&args.address).await {
        Ok(listener) => {
            tracing::info!("Jobly server running at http://{}", args.address);
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Error starting jobly server: {:?}", e);
            }
        }
        Err(e) => {
            tracing::error!("Error binding server to the address: {:?}", e);
        }
    };
}
