use color_eyre::{eyre::eyre, eyre::WrapErr, Result};
use padnav::config::RunnerSettings;
use padnav::controller::event_collector::EventCollector;
use padnav::headless::{HeadlessHost, LogInjector};
use padnav::mapping::{InputMapper, Preferences};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup()?;

    let settings = RunnerSettings::from_args(std::env::args().skip(1));
    let mut prefs = match settings.mode_file_path() {
        Some(path) => Preferences::load_or_default(&path)
            .wrap_err_with(|| format!("Failed to load modes from {}", path.display()))?,
        None => {
            warn!("No config directory, using built-in templates");
            Preferences::default()
        }
    };

    // Controller initialisieren
    let mut collector = EventCollector::create(Some(settings.collector_settings()))
        .map_err(|e| eyre!("Failed to create collector: {}", e))?
        .initialize()
        .map_err(|e| eyre!("Failed to initialize collector: {}", e))?;
    if let Some(name) = collector.gamepad_name() {
        info!("Mapping input of {}", name);
    }

    let mut host = HeadlessHost::default();
    let mut mapper = InputMapper::new(LogInjector::default());
    mapper.start(&mut prefs, &mut host);

    let mut ticker = tokio::time::interval(settings.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Polling every {:?}, Ctrl+C to quit", settings.tick_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = collector.poll();
                mapper.apply(&mut prefs, snapshot, &mut host);
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!("Ctrl+C handler failed: {}", e);
                }
                break;
            }
        }
    }

    mapper.stop(&mut prefs, &mut host);
    info!(
        "Shut down, {} events injected, view at {:?}",
        mapper.injector().delivered,
        host.view.location
    );
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
