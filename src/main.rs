use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memory_palace::db::{self, LogOnError};
use memory_palace::{config, srs};

fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "memory_palace=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let json = std::env::args().skip(1).any(|arg| arg == "--json");

  let app_config = config::load_config();
  let pool = db::init_db(&app_config.database_path).expect("Failed to initialize database");
  let conn = db::try_lock(&pool).expect("Database lock failed during startup");

  let Some(stats) = db::palace_stats(&conn).log_warn("Failed to read palace statistics") else {
    return;
  };

  if json {
    match serde_json::to_string_pretty(&stats) {
      Ok(out) => println!("{}", out),
      Err(e) => tracing::error!("Failed to serialize statistics: {}", e),
    }
    return;
  }

  tracing::info!(
    "{} items, {} mastered, {} pending ({:.1}% progress)",
    stats.total,
    stats.mastered,
    stats.pending,
    stats.progress_percent
  );

  let rooms = db::room_occupancy(&*conn).log_warn_default("Failed to read room occupancy");
  for (room, count) in rooms.iter().filter(|(_, n)| *n > 0) {
    tracing::info!("  {}: {}", room.display_name(), count);
  }

  match srs::review_pool(&*conn) {
    Ok(pool) => tracing::info!(
      "Review available: {} mastered items (failure policy: {})",
      pool.len(),
      app_config.failure_policy.as_str()
    ),
    Err(e) => tracing::info!("Review unavailable: {}", e),
  }
}
