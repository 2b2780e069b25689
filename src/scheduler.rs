//! Retention scheduler
//!
//! The control loop of the daemon. It owns the retention cache and a
//! timeline client and drives three time-triggered operations:
//! - `fetch` (hourly): pull recent items from the remote timeline and
//!   upsert them into the cache
//! - `evict` (every minute): delete cached items older than the retention
//!   window from the remote service, then drop them from the cache
//! - `ping` (every minute, fire-and-forget): keep-alive GET against the
//!   deployment's own public address
//!
//! All cache mutations run sequentially on this single task; that
//! serialization is what makes `RetentionCache` safe without locks. Ping
//! runs in the background but shares no state with the loop.
//!
//! No error from fetch, evict, or ping ever propagates out of the loop.
//! The only exit is graceful shutdown on SIGINT/SIGTERM.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::cache::RetentionCache;
use crate::keepalive::{self, AckServer};
use crate::timeline::{TimelineClient, TimelineError};

/// Timeout for the keep-alive ping request
const PING_TIMEOUT_SECS: u64 = 10;

/// Default eviction/ping cadence
const EVICT_INTERVAL_SECS: u64 = 60;

/// Default fetch cadence
const FETCH_INTERVAL_SECS: u64 = 60 * 60;

/// Retention policy: how old an item may become before it is deleted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetentionPolicy {
    /// Maximum item age
    pub max_age: chrono::Duration,
}

impl RetentionPolicy {
    /// Policy with a window of the given number of days
    pub fn days(days: i64) -> Self {
        Self {
            max_age: chrono::Duration::days(days),
        }
    }

    /// Returns true when an item of the given age is eviction-eligible.
    ///
    /// The comparison is strict: an item exactly at `max_age` is retained
    /// until the next sweep.
    pub fn is_expired(&self, age: chrono::Duration) -> bool {
        age > self.max_age
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::days(7)
    }
}

/// Lifecycle states of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Endpoint launching, initial fetch and sweep running
    Starting,
    /// Timer loop active
    Running,
    /// Shutdown signal received, endpoint draining
    ShuttingDown,
    /// Loop exited
    Stopped,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchedulerState::Starting => "starting",
            SchedulerState::Running => "running",
            SchedulerState::ShuttingDown => "shutting-down",
            SchedulerState::Stopped => "stopped",
        };
        write!(f, "{}", name)
    }
}

/// Result of one eviction sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Cached items examined
    pub scanned: usize,
    /// Items deleted remotely and removed from the cache
    pub evicted: usize,
    /// Expired items whose remote delete failed; kept for retry
    pub failed: usize,
    /// Items with an unparseable timestamp; never eligible
    pub skipped: usize,
}

/// The daemon's control loop
pub struct RetentionScheduler<C: TimelineClient> {
    client: C,
    cache: RetentionCache,
    policy: RetentionPolicy,
    http: reqwest::Client,
    ping_url: String,
    state: SchedulerState,
    evict_every: Duration,
    fetch_every: Duration,
}

impl<C: TimelineClient> RetentionScheduler<C> {
    /// Creates a scheduler with an empty cache in the `Starting` state
    pub fn new(client: C, policy: RetentionPolicy, ping_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(PING_TIMEOUT_SECS))
            .build()
            .context("failed to build keep-alive HTTP client")?;

        Ok(Self {
            client,
            cache: RetentionCache::new(),
            policy,
            http,
            ping_url: ping_url.into(),
            state: SchedulerState::Starting,
            evict_every: Duration::from_secs(EVICT_INTERVAL_SECS),
            fetch_every: Duration::from_secs(FETCH_INTERVAL_SECS),
        })
    }

    /// Runs the scheduler until an interrupt or termination signal arrives.
    ///
    /// Binds the acknowledgment endpoint on `port`, performs the startup
    /// fetch and sweep, then enters the timer loop.
    pub async fn run(self, port: u16) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        spawn_signal_listener(shutdown_tx);
        self.run_until_shutdown(port, shutdown_rx).await
    }

    /// Timer loop body, driven by an externally supplied shutdown channel
    async fn run_until_shutdown(
        mut self,
        port: u16,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) -> Result<()> {
        info!(state = %self.state, "Retention scheduler starting");

        let server = AckServer::start(port).await?;

        // Startup fetch before the first sweep so the sweep sees fresh
        // data. Neither failure is fatal.
        if let Err(e) = self.fetch().await {
            warn!(error = %e, "Startup fetch failed");
        }
        self.evict().await;

        self.transition(SchedulerState::Running);

        let mut evict_timer = tokio::time::interval(self.evict_every);
        let mut fetch_timer = tokio::time::interval(self.fetch_every);
        // Consume the immediate first tick of each interval; the startup
        // fetch and sweep already ran.
        evict_timer.tick().await;
        fetch_timer.tick().await;

        loop {
            tokio::select! {
                _ = evict_timer.tick() => {
                    self.spawn_ping();
                    self.evict().await;
                }
                _ = fetch_timer.tick() => {
                    if let Err(e) = self.fetch().await {
                        warn!(error = %e, retryable = e.is_retryable(), "Scheduled fetch failed");
                    }
                }
                _ = shutdown_rx.recv() => {
                    self.transition(SchedulerState::ShuttingDown);
                    break;
                }
            }
        }

        server.shutdown().await;
        self.transition(SchedulerState::Stopped);
        Ok(())
    }

    /// Pulls the recent timeline and upserts every returned item.
    ///
    /// The remote copy is authoritative for content but not membership:
    /// items no longer returned are not removed here, only by the age
    /// check in `evict`. On failure the cache is left unchanged.
    async fn fetch(&mut self) -> Result<usize, TimelineError> {
        let items = self.client.list_timeline().await?;
        let fetched = items.len();
        self.cache.upsert_all(items);

        info!(fetched = fetched, cached = self.cache.len(), "Timeline fetched");
        Ok(fetched)
    }

    /// One eviction sweep over the cache snapshot.
    ///
    /// Deletes every item older than the retention window from the remote
    /// service and removes it from the cache on success. A failed delete
    /// keeps the item cached for retry on the next sweep and never aborts
    /// the rest of the sweep. Items with an unparseable timestamp are
    /// skipped.
    async fn evict(&mut self) -> SweepOutcome {
        let now = Utc::now();
        let snapshot = self.cache.snapshot();
        let mut outcome = SweepOutcome {
            scanned: snapshot.len(),
            ..SweepOutcome::default()
        };

        for (id, item) in snapshot {
            let age = match item.age(now) {
                Some(age) => age,
                None => {
                    warn!(
                        item_id = %id,
                        created_at = %item.created_at,
                        "Unparseable timestamp, item is never eviction-eligible"
                    );
                    outcome.skipped += 1;
                    continue;
                }
            };

            if !self.policy.is_expired(age) {
                continue;
            }

            match self.client.delete_item(id).await {
                Ok(()) => {
                    self.cache.remove(id);
                    outcome.evicted += 1;
                    info!(item_id = %id, age_days = age.num_days(), "Evicted expired item");
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        item_id = %id,
                        error = %e,
                        "Failed to delete expired item, keeping it for retry"
                    );
                }
            }
        }

        if outcome.evicted > 0 || outcome.failed > 0 {
            info!(
                scanned = outcome.scanned,
                evicted = outcome.evicted,
                failed = outcome.failed,
                skipped = outcome.skipped,
                "Eviction sweep complete"
            );
        }

        outcome
    }

    /// Fires the keep-alive ping in the background. Failure is logged and
    /// otherwise ignored; the ping never touches the cache.
    fn spawn_ping(&self) {
        let client = self.http.clone();
        let url = self.ping_url.clone();

        tokio::spawn(async move {
            if let Err(e) = keepalive::ping(&client, &url).await {
                warn!(error = %e, "Keep-alive ping failed");
            }
        });
    }

    fn transition(&mut self, next: SchedulerState) {
        info!(from = %self.state, to = %next, "Scheduler state change");
        self.state = next;
    }

    #[cfg(test)]
    fn set_intervals(&mut self, evict_every: Duration, fetch_every: Duration) {
        self.evict_every = evict_every;
        self.fetch_every = fetch_every;
    }

    #[cfg(test)]
    fn cache(&self) -> &RetentionCache {
        &self.cache
    }
}

/// Forwards SIGINT/SIGTERM to the shutdown channel
fn spawn_signal_listener(shutdown_tx: mpsc::Sender<()>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "Failed to install SIGINT handler");
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
                _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
            }
        }
        #[cfg(not(unix))]
        {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => {
                    error!(error = %e, "Failed to listen for shutdown signal");
                    return;
                }
            }
        }

        let _ = shutdown_tx.send(()).await;
    });
}
