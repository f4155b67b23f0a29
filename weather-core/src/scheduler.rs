//! Periodic fetch → normalize cycles.
//!
//! The timer is self-rescheduling: the interval is measured from the end of
//! one cycle to the start of the next, so slow fetches never overlap. At most
//! one cycle is in flight; a refresh requested meanwhile is coalesced.

use parking_lot::{Mutex, RwLock};
use std::{
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::Configuration,
    error::WeatherError,
    fetcher::WeatherFetcher,
    model::WeatherSnapshot,
    normalize::normalize,
    query::WeatherQueryBuilder,
};

/// Icon-theme lookup supplied by the display side.
pub type IconExists = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
    Running,
}

/// Result of one refresh attempt. Never an `Err`: failures are values.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// A new snapshot was built and published.
    Updated(Arc<WeatherSnapshot>),
    /// The cycle failed; the previous snapshot stays published.
    Failed(WeatherError),
    /// Another cycle was already in flight.
    Coalesced,
    /// The scheduler was stopped while this cycle was in flight.
    Discarded,
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated(_))
    }
}

#[derive(Clone)]
pub struct RefreshScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    fetcher: RwLock<Arc<dyn WeatherFetcher>>,
    config: watch::Receiver<Configuration>,
    icon_exists: IconExists,
    snapshots: watch::Sender<Option<Arc<WeatherSnapshot>>>,
    interval: Mutex<Duration>,
    cycle: tokio::sync::Mutex<()>,
    timer: Mutex<Option<CancellationToken>>,
    // bumped by every stop(); a cycle that sees it change drops its result
    epoch: AtomicU64,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(token) = self.timer.get_mut().take() {
            token.cancel();
        }
    }
}

impl RefreshScheduler {
    pub fn new(
        fetcher: Arc<dyn WeatherFetcher>,
        config: watch::Receiver<Configuration>,
        icon_exists: IconExists,
    ) -> Self {
        let interval = config.borrow().refresh_interval();
        let (snapshots, _) = watch::channel(None);

        Self {
            inner: Arc::new(Inner {
                fetcher: RwLock::new(fetcher),
                config,
                icon_exists,
                snapshots,
                interval: Mutex::new(interval),
                cycle: tokio::sync::Mutex::new(()),
                timer: Mutex::new(None),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Receives every snapshot as a whole, as soon as it is built.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<WeatherSnapshot>>> {
        self.inner.snapshots.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<WeatherSnapshot>> {
        self.inner.snapshots.borrow().clone()
    }

    pub fn interval(&self) -> Duration {
        *self.inner.interval.lock()
    }

    pub fn state(&self) -> SchedulerState {
        if self.inner.cycle.try_lock().is_err() {
            return SchedulerState::Running;
        }

        match self.inner.timer.lock().as_ref() {
            Some(token) if !token.is_cancelled() => SchedulerState::Scheduled,
            _ => SchedulerState::Idle,
        }
    }

    /// Fires one refresh after `initial_delay`, then keeps refreshing every
    /// `interval` until stopped. Restarts the timer if already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, initial_delay: Duration, interval: Duration) {
        *self.inner.interval.lock() = interval;

        let token = CancellationToken::new();
        if let Some(previous) = self.inner.timer.lock().replace(token.clone()) {
            previous.cancel();
        }

        info!(?initial_delay, ?interval, "refresh scheduler started");

        tokio::spawn(run_timer(Arc::downgrade(&self.inner), token, initial_delay));
    }

    /// Swaps the fetcher used by the next cycle, e.g. after the HTTP
    /// settings changed. A cycle already in flight keeps the old one.
    pub fn replace_fetcher(&self, fetcher: Arc<dyn WeatherFetcher>) {
        debug!(?fetcher, "fetcher replaced");
        *self.inner.fetcher.write() = fetcher;
    }

    fn fetcher(&self) -> Arc<dyn WeatherFetcher> {
        self.inner.fetcher.read().clone()
    }

    /// Changes the delay used after the current cycle. A pending sleep keeps
    /// its original length.
    pub fn update_interval(&self, interval: Duration) {
        debug!(?interval, "refresh interval updated");
        *self.inner.interval.lock() = interval;
    }

    /// Cancels the pending timer. A fetch already in flight completes, but
    /// its result is dropped. Safe to call in any state.
    pub fn stop(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);

        if let Some(token) = self.inner.timer.lock().take() {
            token.cancel();
            info!("refresh scheduler stopped");
        }
    }

    /// Runs one fetch → normalize cycle and publishes the snapshot.
    pub async fn refresh_once(&self) -> RefreshOutcome {
        let Ok(_cycle) = self.inner.cycle.try_lock() else {
            debug!("refresh already in flight, coalescing");
            return RefreshOutcome::Coalesced;
        };

        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        let config = self.inner.config.borrow().clone();
        let result = self.run_cycle(&config).await;

        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            debug!("scheduler stopped during refresh, discarding result");
            return RefreshOutcome::Discarded;
        }

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.inner.snapshots.send_replace(Some(Arc::clone(&snapshot)));
                info!(location = %snapshot.location, "weather updated");
                RefreshOutcome::Updated(snapshot)
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "weather refresh failed");
                RefreshOutcome::Failed(err)
            }
        }
    }

    #[instrument(skip_all, fields(location = %config.location_id))]
    async fn run_cycle(&self, config: &Configuration) -> Result<WeatherSnapshot, WeatherError> {
        let request = WeatherQueryBuilder::new(&config.http.endpoint)?
            .build_query(&config.location_id, config.temperature_unit)?;

        let doc = self.fetcher().fetch(&request).await?;

        normalize(&doc, config, |name| (self.inner.icon_exists)(name))
    }
}

/// Only holds the scheduler while a cycle runs, so dropping every handle
/// ends the timer.
async fn run_timer(inner: Weak<Inner>, token: CancellationToken, initial_delay: Duration) {
    let mut delay = initial_delay;

    while sleep_or_cancel(&token, delay).await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let scheduler = RefreshScheduler { inner };

        scheduler.refresh_once().await;
        if token.is_cancelled() {
            break;
        }
        delay = scheduler.interval();
    }

    debug!("refresh timer finished");
}

/// Sleeps for `duration`; `false` if cancelled first.
async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

impl fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("fetcher", &self.fetcher())
            .field("state", &self.state())
            .field("interval", &self.interval())
            .finish_non_exhaustive()
    }
}
