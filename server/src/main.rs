use clap::Parser;
use sea_orm::{EntityTrait, PaginatorTrait};
use tracing_subscriber::EnvFilter;

use safety_voice::config::Args;
use safety_voice::db;
use safety_voice::entities::{recording, safe_zone, user};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .init();

    tracing::info!("Initializing database at {}", args.db_path);
    let pool = db::init_pool(&args.db_path).await?;
    let conn = db::connect(pool);

    let users = user::Entity::find().count(&conn).await?;
    let recordings = recording::Entity::find().count(&conn).await?;
    let safe_zones = safe_zone::Entity::find().count(&conn).await?;
    tracing::info!(users, recordings, safe_zones, "Database ready");

    Ok(())
}
