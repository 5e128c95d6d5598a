mod analytics;
mod app;
mod compute;
mod config;
mod event;
mod float;
mod model;
mod selection;
mod source;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "trackboard")]
#[command(about = "A terminal UI project-tracking dashboard")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/trackboard/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Path to a JSON issue fixture; overrides config and the built-in sample
  #[arg(short, long)]
  data: Option<PathBuf>,
}

/// Log to a file under the data dir; stdout belongs to the terminal UI.
/// The guard must stay alive for the duration of the program.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let dir = dirs::data_dir()?.join("trackboard");
  std::fs::create_dir_all(&dir).ok()?;
  let appender = tracing_appender::rolling::never(dir, "trackboard.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_env("TRACKBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();
  Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = init_logging();

  let config = config::Config::load(args.config.as_deref())?;

  // Explicit --data wins over the config, which wins over the sample
  let data_path = args.data.or_else(|| config.data.clone());
  let portfolio = source::load(data_path.as_deref())?;
  tracing::info!(issues = portfolio.issues.len(), "loaded issue collection");

  let mut app = app::App::new(config, portfolio);
  app.run().await?;

  Ok(())
}
