use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::collector::SnapshotCollector;
use crate::prelude::*;
use crate::process::{ProcessSource, UserResolver};
use crate::render::Renderer;
use crate::table::SharedTable;

/// Periodic snapshot + render cycle
pub struct Monitor<S, U, W> {
    collector: Arc<SnapshotCollector<S, U>>,
    table: SharedTable,
    renderer: Renderer<W>,
    refresh_interval: Duration,
}

impl<S, U, W> Monitor<S, U, W>
where
    S: ProcessSource + Send + Sync + 'static,
    U: UserResolver + Send + Sync + 'static,
    W: Write,
{
    pub fn new(
        collector: SnapshotCollector<S, U>,
        table: SharedTable,
        renderer: Renderer<W>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            collector: Arc::new(collector),
            table,
            renderer,
            refresh_interval,
        }
    }

    /// Collect and publish a new snapshot, then draw it
    pub async fn tick(&mut self) -> Result<()> {
        let collector = Arc::clone(&self.collector);
        let table = self.table.clone();
        tokio::task::spawn_blocking(move || collector.refresh(&table))
            .await
            .context("Snapshot collection task failed")??;

        let current = self.table.snapshot();
        self.renderer.render(&current)
    }

    /// Refresh every `refresh_interval` until `cancel` fires.
    ///
    /// The first refresh happens immediately, any error ends the loop.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        let mut interval = tokio::time::interval(self.refresh_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                _ = interval.tick() => {}
            }
            self.tick().await?;
        }
    }

    #[cfg(test)]
    fn into_renderer(self) -> Renderer<W> {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::tests::{FakeEntry, FakeSource, FakeUsers};
    use crate::render::CLEAR_SCREEN;

    fn monitor(source: FakeSource) -> Monitor<FakeSource, FakeUsers, Vec<u8>> {
        Monitor::new(
            SnapshotCollector::new(source, FakeUsers::default(), 20),
            SharedTable::new(),
            Renderer::new(Vec::new()),
            Duration::from_millis(10),
        )
    }

    #[test_log::test(tokio::test)]
    async fn test_tick_publishes_and_renders() {
        let mut monitor = monitor(FakeSource::new(vec![FakeEntry::process(
            1234, 1000, "bash", 'S',
        )]));
        let table = monitor.table.clone();

        monitor.tick().await.unwrap();

        assert!(table.snapshot().contains(1234));
        let output = String::from_utf8(monitor.into_renderer().into_inner()).unwrap();
        assert!(output.starts_with(CLEAR_SCREEN));
        assert!(output.contains("1234\t| alice   \t| bash"));
    }

    #[test_log::test(tokio::test)]
    async fn test_run_refreshes_until_cancelled() {
        let mut monitor = monitor(FakeSource::new(vec![FakeEntry::process(
            1, 0, "init", 'S',
        )]));
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        monitor.run(cancel).await.unwrap();

        let output = String::from_utf8(monitor.into_renderer().into_inner()).unwrap();
        assert!(output.matches(CLEAR_SCREEN).count() >= 2);
    }

    #[test_log::test(tokio::test)]
    async fn test_run_fails_without_namespace() {
        let mut monitor = monitor(FakeSource {
            unavailable: true,
            ..Default::default()
        });

        let err = monitor.run(CancellationToken::new()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to open process namespace"));
        assert!(monitor.table.snapshot().is_empty());
        assert!(monitor.into_renderer().into_inner().is_empty());
    }
}
