#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]

use roster_db::migrate;
use roster_server::{bootstrap, runtime, settings};

mod cli;

#[tokio::main]
async fn main() {
    let run_mode = cli::parse_args();
    runtime::init_tracing();
    let settings = settings::Settings::from_env();
    let metrics_config = settings.config.metrics.clone();
    if run_mode == cli::RunMode::Server {
        if let Err(missing) = settings::preflight(&settings) {
            tracing::error!(
                event = "preflight_failed",
                missing = ?missing,
                "Required configuration missing"
            );
            std::process::exit(1);
        }
    }
    bootstrap::log_startup(&settings, &metrics_config);
    bootstrap::init_metrics_registry(&metrics_config);

    let db = match bootstrap::connect_db(&settings).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(event = "db_connect_failed", error = %err);
            std::process::exit(1);
        }
    };
    if let Err(err) = migrate(&db).await {
        tracing::error!(event = "migration_failed", error = %err);
        std::process::exit(1);
    }
    if run_mode == cli::RunMode::Migrate {
        tracing::info!(event = "migrations_applied", "migrations applied");
        return;
    }

    let state = bootstrap::build_state(&settings, db);
    let app = bootstrap::build_app(&metrics_config, state);
    bootstrap::serve(&settings, app).await;
}
