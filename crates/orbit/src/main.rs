use anyhow::Context;
use clap::{Parser, Subcommand};
use orbit::config;
use orbit::gui::app::{self, AppInit, AppModel};
use orbit::gui::ring::RingModel;
use orbit::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orbit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of the platform default
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Write the default config (if missing) and print its path.
    Init,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = config::resolve_config_path(cli.config.as_deref())?;

    if let Some(Commands::Init) = cli.command {
        let path = config::write_default_config(&config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path);
    let (tx, rx) = async_channel::unbounded();

    let ring = RingModel::from_config(&config, &config_path, app::active_notifier(tx.clone()))
        .context("Failed to build the image ring")?;

    // Start Background Services
    runtime::start_background_services(config_path.clone(), tx.clone());

    // GTK would otherwise try to parse our own flags
    let app = RelmApp::new("org.orbit.orbit").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        ring,
        window: config.window,
        config_path,
        events_tx: tx,
        events_rx: rx,
    });
    Ok(())
}
