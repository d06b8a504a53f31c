use std::path::PathBuf;

use clap::Parser;
use neutrino::{db, foods::import};

/// Load a food nutrition JSON dataset into the database.
#[derive(Debug, Parser)]
#[command(name = "import-foods", version)]
struct Args {
    /// JSON array of food records (food_code, food_name, unit_serving_* fields)
    path: PathBuf,

    /// Database to import into; defaults to DATABASE_URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://neutrino.db?mode=rwc")]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    neutrino::init_tracing();
    let args = Args::parse();

    let pool = db::connect(&args.database_url).await?;
    db::migrate(&pool).await?;
    let count = import::import_file(&pool, &args.path).await?;
    tracing::info!(count, path = %args.path.display(), "import finished");
    Ok(())
}
