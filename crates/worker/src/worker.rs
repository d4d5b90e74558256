use crate::ingest::{Ingestor, Outcome};
use crate::schedule::next_run;
use apod_config::WorkerConfig;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Runs an [`Ingestor`] once a day at a fixed wall-clock time.
pub struct Worker<Tz: TimeZone = Local> {
    ingestor: Ingestor,
    config: WorkerConfig,
    /// The run time is read in this zone. Its offset is looked up again on
    /// every tick, so daylight-saving changes are followed.
    zone: Tz,
}

impl Worker {
    /// A worker on the system's local time zone.
    pub fn new(ingestor: Ingestor, config: WorkerConfig) -> Self {
        Self::with_zone(ingestor, config, Local)
    }
}

impl<Tz> Worker<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
    Tz::Offset: Send + Sync + fmt::Display,
{
    pub fn with_zone(ingestor: Ingestor, config: WorkerConfig, zone: Tz) -> Self {
        Self { ingestor, config, zone }
    }

    /// Start the scheduler loop on the current runtime.
    ///
    /// The loop exits when `shutdown` is cancelled. Ingestions already in
    /// flight are detached and not waited for.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown).instrument(tracing::info_span!("worker")))
    }

    async fn run(self, shutdown: CancellationToken) {
        if self.config.run_on_start {
            tracing::info!("running initial ingestion");
            self.trigger();
        }
        // The last target we fired for. Scheduling from it as well as from
        // the clock stops an early wake-up (or a clock step backwards) from
        // firing the same target twice.
        let mut last_target: Option<DateTime<Tz>> = None;
        loop {
            let now = Utc::now().with_timezone(&self.zone);
            let from = match &last_target {
                Some(last) if *last > now => last.clone(),
                _ => now.clone(),
            };
            let target = next_run(&from, self.config.run_at);
            let wait = target.clone().signed_duration_since(&now).to_std().unwrap_or_default();
            tracing::info!(next_run = %target.to_rfc3339(), "next ingestion scheduled");
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!("scheduler stopped");
                    return;
                }
                () = tokio::time::sleep(wait) => {
                    last_target = Some(target);
                    self.trigger();
                }
            }
        }
    }

    /// Fire one ingestion as its own task and log how it went.
    fn trigger(&self) {
        let ingestor = self.ingestor.clone();
        tokio::spawn(
            async move {
                match ingestor.run().await {
                    Ok(Outcome::Archived(entry)) => {
                        tracing::info!(date = %entry.date, id = entry.id, title = %entry.title, "picture archived")
                    },
                    Ok(Outcome::AlreadyArchived(_)) => {},
                    Err(err) => tracing::error!(error = ?err, "ingestion failed, will retry on the next tick"),
                }
            }
            .in_current_span(),
        );
    }
}
