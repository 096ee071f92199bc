use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use myrtio_strip_engine::{
    DaemonConfig, Engine, EffectManager, Error, OutputSink, Result, StateStore,
    output::{DeviceDriver, OutputDriver},
    state::JsonFileStorage,
};

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            leds,
            fps,
            state,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(leds) = leds {
                config.strip.led_count = leds;
            }
            if let Some(fps) = fps {
                config.animation.target_fps = fps;
            }
            if let Some(state) = state {
                config.state.path = state;
            }
            run(&config)
        }
        Commands::Effects { config } => {
            let config = load_config(config.as_deref())?;
            print_effects(&config)
        }
    }
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<DaemonConfig> {
    match path {
        Some(path) => DaemonConfig::load(path),
        None => Ok(DaemonConfig::default()),
    }
}

fn run(config: &DaemonConfig) -> Result<()> {
    let store = StateStore::open(
        Box::new(JsonFileStorage::new(&config.state.path)),
        config.state.save_debounce(),
    )?;

    let sink = OutputSink::open(&config.strip, |strip| {
        DeviceDriver::open(Path::new(&strip.device))
            .map(|driver| Box::new(driver) as Box<dyn OutputDriver>)
    });
    log::info!(
        "daemon: {} LEDs, mock={}",
        sink.led_count(),
        sink.is_mock()
    );

    let mut engine = Engine::new(sink, config.animation.target_fps);
    log::info!("daemon: {} effects available", engine.list_effects().len());

    let saved = store.state().clone();
    engine.apply_state(&saved);
    engine.start()?;

    log::info!(
        "daemon: power {}, effect {}, brightness {}",
        if saved.power { "on" } else { "off" },
        engine.current_name(),
        saved.brightness
    );

    wait_for_shutdown()?;

    log::info!("daemon: stopping");
    engine.shutdown();
    store.flush();
    log::info!("daemon: shutdown complete");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_effects(config: &DaemonConfig) -> Result<()> {
    let manager = EffectManager::new(config.strip.led_count);
    let json = serde_json::to_string_pretty(&manager.list_effects())
        .map_err(|err| Error::Config(err.to_string()))?;
    println!("{json}");
    Ok(())
}

#[cfg(unix)]
fn wait_for_shutdown() -> Result<()> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    if let Some(signal) = signals.forever().next() {
        log::info!("daemon: received signal {signal}");
    }
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown() -> Result<()> {
    log::info!("daemon: press Enter to stop");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Addressable LED strip effect daemon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the strip until interrupted.
    Run {
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of LEDs, overrides the configuration.
        #[arg(long)]
        leds: Option<usize>,
        /// Target frame rate, overrides the configuration.
        #[arg(long)]
        fps: Option<u32>,
        /// State file, overrides the configuration.
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Print the effect catalogue as JSON.
    Effects {
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
