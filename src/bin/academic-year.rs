//! Lists the configured academic years and the one that would be pre-selected.
//!
//! Reads `ERP_*` configuration and `ERP_SESSION_TOKEN` from the environment.

use std::sync::Arc;

use academic_year::{
    Clock, ControlDeps, ControlProps, FixedClock, LogNotifier, LookupClient, LookupConfig, Phase,
    SelectionControl, SessionTokens, SystemClock, Today,
};
use clap::Parser;
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "academic-year")]
#[command(about = "Show academic years and the default selection")]
#[command(version)]
struct Cli {
    /// Pretend the current date is this month (YYYY-MM or YYYY-MM-DD)
    #[arg(long)]
    today: Option<Today>,

    /// Already selected id; suppresses the default
    #[arg(long, default_value = "")]
    value: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = LookupConfig::from_env()?;
    tracing::info!(
        endpoint = %config.endpoint(),
        app_version = %config.app_version,
        "configuration loaded"
    );

    let tokens = SessionTokens::new();
    if let Ok(token) = std::env::var("ERP_SESSION_TOKEN") {
        tokens.set(token);
    }

    let clock: Arc<dyn Clock> = match cli.today {
        Some(today) => Arc::new(FixedClock(today)),
        None => Arc::new(SystemClock),
    };

    let deps = ControlDeps {
        source: Arc::new(LookupClient::new(&config)?),
        tokens: Arc::new(tokens),
        notifier: Arc::new(LogNotifier),
        clock,
    };

    let proposed = Arc::new(Mutex::new(None::<String>));
    let sink = Arc::clone(&proposed);
    let control = SelectionControl::new(
        deps,
        ControlProps::with_value(cli.value.clone()),
        Arc::new(move |id: &str| *sink.lock() = Some(id.to_owned())),
    );

    control.mount().await;
    if control.phase() == Phase::FetchFailed {
        return Err("academic years could not be loaded".into());
    }

    let chosen = proposed
        .lock()
        .clone()
        .or(Some(cli.value).filter(|v| !v.is_empty()));
    let view = control.view();
    if view.options.is_empty() {
        println!("(no academic years configured)");
    }
    for option in &view.options {
        let marker = if chosen.as_deref() == Some(option.value.as_str()) {
            '*'
        } else {
            ' '
        };
        println!("{marker} {:<12} {}", option.value, option.label);
    }
    if chosen.is_none() {
        println!("no default; {}", view.placeholder.to_lowercase());
    }

    control.unmount();
    Ok(())
}
