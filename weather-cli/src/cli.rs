use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{info, warn};
use weather_core::{
    Configuration, HttpWeatherFetcher, RefreshOutcome, RefreshScheduler, WeatherSnapshot,
};

use crate::{icons::icon_lookup, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "shell-weather", version, about = "Panel weather, on the command line")]
pub struct Cli {
    /// Configuration file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Location id, overriding the configuration file.
    #[arg(long, global = true)]
    pub location: Option<String>,

    /// Directory holding `<icon>.svg` / `<icon>.png` files; may be repeated.
    #[arg(long = "icon-dir", global = true)]
    pub icon_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh once and print the panel text and popup.
    Show {
        /// Print the snapshot as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Keep refreshing on the configured interval until interrupted.
    ///
    /// On Unix, SIGHUP reloads the configuration file.
    Watch {
        /// Seconds before the first refresh.
        #[arg(long, default_value_t = 3)]
        initial_delay: u64,
    },

    /// Print the effective configuration as TOML.
    Config,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match &self.command {
            Command::Show { json } => self.show(config, *json).await,
            Command::Watch { initial_delay } => {
                self.watch(config, Duration::from_secs(*initial_delay)).await
            }
            Command::Config => {
                let toml = toml_string(&config)?;
                print!("{toml}");
                Ok(())
            }
        }
    }

    fn load_config(&self) -> anyhow::Result<Configuration> {
        let mut config = match &self.config {
            Some(path) => Configuration::load_from(path)?,
            None => Configuration::load()?,
        };

        if let Some(location) = &self.location {
            config.location_id = location.clone();
        }

        Ok(config)
    }

    fn scheduler(
        &self,
        config: &Configuration,
    ) -> anyhow::Result<(RefreshScheduler, watch::Sender<Configuration>)> {
        let fetcher = HttpWeatherFetcher::new(&config.http)
            .context("Failed to create the weather HTTP client")?;

        let (tx, rx) = watch::channel(config.clone());
        let scheduler = RefreshScheduler::new(Arc::new(fetcher), rx, icon_lookup(&self.icon_dirs));

        Ok((scheduler, tx))
    }

    async fn show(&self, config: Configuration, json: bool) -> anyhow::Result<()> {
        let (scheduler, _tx) = self.scheduler(&config)?;

        match scheduler.refresh_once().await {
            RefreshOutcome::Updated(snapshot) => {
                if json {
                    let out = serde_json::to_string_pretty(snapshot.as_ref())
                        .context("Failed to serialize snapshot")?;
                    println!("{out}");
                } else {
                    print_snapshot(&snapshot, &config)?;
                }
                Ok(())
            }
            RefreshOutcome::Failed(err) => Err(anyhow!(err)),
            other => Err(anyhow!("Refresh did not complete: {other:?}")),
        }
    }

    async fn watch(&self, config: Configuration, initial_delay: Duration) -> anyhow::Result<()> {
        let (scheduler, tx) = self.scheduler(&config)?;
        let mut snapshots = scheduler.subscribe();

        scheduler.start(initial_delay, config.refresh_interval());

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut reload = ReloadSignal::new();

        loop {
            tokio::select! {
                res = &mut ctrl_c => {
                    res.context("Failed to listen for Ctrl-C")?;
                    break;
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    if let Some(snapshot) = snapshot {
                        print_snapshot(&snapshot, &tx.borrow())?;
                    }
                }
                () = reload.recv() => {
                    self.reload(&scheduler, &tx);
                }
            }
        }

        scheduler.stop();
        Ok(())
    }

    /// Re-reads the configuration and triggers a fresh cycle.
    fn reload(&self, scheduler: &RefreshScheduler, tx: &watch::Sender<Configuration>) {
        let config = match self.load_config() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "configuration reload failed, keeping the old one");
                return;
            }
        };

        apply_config(scheduler, tx, config);
        info!("configuration reloaded");

        let scheduler = scheduler.clone();
        tokio::spawn(async move {
            scheduler.refresh_once().await;
        });
    }
}

/// Hands a reloaded configuration to the scheduler. Returns `true` when the
/// HTTP settings changed and a new fetcher took over.
fn apply_config(
    scheduler: &RefreshScheduler,
    tx: &watch::Sender<Configuration>,
    config: Configuration,
) -> bool {
    if config.refresh_interval() != scheduler.interval() {
        scheduler.update_interval(config.refresh_interval());
    }

    let mut rebuilt = false;
    if config.http != tx.borrow().http {
        match HttpWeatherFetcher::new(&config.http) {
            Ok(fetcher) => {
                scheduler.replace_fetcher(Arc::new(fetcher));
                rebuilt = true;
            }
            Err(err) => warn!(error = %err, "keeping the old HTTP client"),
        }
    }

    tx.send_replace(config);
    rebuilt
}

fn print_snapshot(snapshot: &WeatherSnapshot, config: &Configuration) -> anyhow::Result<()> {
    let popup = render::popup(snapshot).context("Failed to render the popup")?;
    let updated = chrono::Local::now().format("%H:%M:%S");
    println!("{updated}  {}", render::panel_line(snapshot, config));
    print!("{popup}");
    Ok(())
}

fn toml_string(config: &Configuration) -> anyhow::Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration to TOML")
}

/// SIGHUP listener, registered once for the whole watch loop.
#[cfg(unix)]
struct ReloadSignal(Option<tokio::signal::unix::Signal>);

#[cfg(unix)]
impl ReloadSignal {
    fn new() -> Self {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::hangup()) {
            Ok(hangup) => Self(Some(hangup)),
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGHUP");
                Self(None)
            }
        }
    }

    async fn recv(&mut self) {
        let received = match &mut self.0 {
            Some(hangup) => hangup.recv().await.is_some(),
            None => false,
        };
        if !received {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
struct ReloadSignal;

#[cfg(not(unix))]
impl ReloadSignal {
    fn new() -> Self {
        ReloadSignal
    }

    async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}
