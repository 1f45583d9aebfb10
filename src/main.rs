use anyhow::{Context, Result};
use clap::Parser;
use juju_tui_monitor::{App, config::Config};
use std::fs::File;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let config = Config::parse();

    if let Some(path) = &config.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .event_format(fmt::format().compact().with_target(false)),
            )
            .init();
    }

    info!("Starting dashboard for {}", config.snapshot.display());
    let mut app = App::new(config.snapshot.clone(), config.tick_rate());
    app.refresh();
    if let Some(service) = &config.service {
        if !app.select_service(service) {
            warn!("Service {service} not found in snapshot");
        }
    }

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
