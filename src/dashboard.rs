//! Dashboard client: refresh cycles, dark-mode toggle and the poller.
//!
//! A refresh cycle fetches `/api/stats`, `/api/globals` and `/api/hofs` as
//! three independent tasks, each rendering its own part of the document.
//! The poller runs cycles back to back with a fixed pause in between and
//! never lets two cycles overlap.

use crate::client::{Endpoint, Fetch};
use crate::document::{ids, new_shared_document, Document, SharedDocument, ToggleControl};
use crate::errors::{DashboardError, FetchError};
use crate::model::{local_now, RecordList, StatsSnapshot};
use crate::preference::{
    load_dark_mode, save_dark_mode, toggle_icon, KeyValueStore, DARK_MODE_CLASS, TOGGLE_TITLE,
};
use crate::render::{render_records, render_stats, RecordKind};
use chrono::Local;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::{AbortHandle, JoinError, JoinHandle};

/// Default pause between refresh cycles
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(30_000);

/// Result of one endpoint within a refresh cycle
#[derive(Debug)]
pub enum EndpointOutcome {
    /// Fetched, decoded and written into the document
    Rendered,
    /// Transport failure, bad status or undecodable body
    Failed(FetchError),
    /// The render step or the task itself failed
    Aborted(DashboardError),
}

impl EndpointOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, EndpointOutcome::Rendered)
    }
}

/// Per-endpoint outcomes of a settled refresh cycle
#[derive(Debug)]
pub struct CycleReport {
    pub stats: EndpointOutcome,
    pub globals: EndpointOutcome,
    pub hofs: EndpointOutcome,
}

impl CycleReport {
    pub fn outcomes(&self) -> [(Endpoint, &EndpointOutcome); 3] {
        [
            (Endpoint::Stats, &self.stats),
            (Endpoint::Globals, &self.globals),
            (Endpoint::Hofs, &self.hofs),
        ]
    }

    pub fn all_rendered(&self) -> bool {
        self.outcomes().iter().all(|(_, outcome)| outcome.is_rendered())
    }

    fn log(&self) {
        let rendered = self
            .outcomes()
            .iter()
            .filter(|(_, outcome)| outcome.is_rendered())
            .count();
        tracing::debug!(rendered, total = 3, "Refresh cycle settled");
    }
}

/// The three in-flight requests of one refresh
#[derive(Debug)]
pub struct RefreshCycle {
    stats: JoinHandle<EndpointOutcome>,
    globals: JoinHandle<EndpointOutcome>,
    hofs: JoinHandle<EndpointOutcome>,
}

impl RefreshCycle {
    /// Wait until every request has rendered or failed
    pub async fn settle(mut self) -> CycleReport {
        let (stats, globals, hofs) =
            futures::future::join3(&mut self.stats, &mut self.globals, &mut self.hofs).await;
        CycleReport {
            stats: joined(stats),
            globals: joined(globals),
            hofs: joined(hofs),
        }
    }

    /// Cancel whatever is still in flight
    pub fn abort(&self) {
        for handle in self.abort_handles() {
            handle.abort();
        }
    }

    fn abort_handles(&self) -> [AbortHandle; 3] {
        [
            self.stats.abort_handle(),
            self.globals.abort_handle(),
            self.hofs.abort_handle(),
        ]
    }
}

fn joined(result: Result<EndpointOutcome, JoinError>) -> EndpointOutcome {
    result.unwrap_or_else(|e| EndpointOutcome::Aborted(DashboardError::Task(e.to_string())))
}

enum Payload {
    Stats(StatsSnapshot),
    Records(RecordKind, RecordList),
}

fn decode(endpoint: Endpoint, path: &str, body: &str) -> Result<Payload, FetchError> {
    let decoded = match endpoint {
        Endpoint::Stats => serde_json::from_str(body).map(Payload::Stats),
        Endpoint::Globals => {
            serde_json::from_str(body).map(|list| Payload::Records(RecordKind::Global, list))
        }
        Endpoint::Hofs => {
            serde_json::from_str(body).map(|list| Payload::Records(RecordKind::Hof, list))
        }
    };
    decoded.map_err(|source| FetchError::Decode {
        endpoint: path.to_string(),
        source,
    })
}

fn write_document(document: &SharedDocument) -> RwLockWriteGuard<'_, Document> {
    document.write().unwrap_or_else(PoisonError::into_inner)
}

async fn fetch_and_render(
    fetcher: Arc<dyn Fetch>,
    document: SharedDocument,
    endpoint: Endpoint,
    path: String,
) -> EndpointOutcome {
    let payload = match fetcher.fetch(&path).await {
        Ok(body) => decode(endpoint, &path, &body),
        Err(e) => Err(e),
    };

    let payload = match payload {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(endpoint = %endpoint, error = %e, "Error fetching {}", endpoint);
            return EndpointOutcome::Failed(e);
        }
    };

    let mut doc = write_document(&document);
    let rendered = match payload {
        Payload::Stats(stats) => render_stats(&mut doc, &stats),
        Payload::Records(kind, list) => render_records(&mut doc, kind, list, &Local),
    };

    match rendered {
        Ok(()) => EndpointOutcome::Rendered,
        Err(e) => {
            tracing::error!(endpoint = %endpoint, error = %e, "Error rendering {}", endpoint);
            EndpointOutcome::Aborted(e)
        }
    }
}

/// Polls the stats service and keeps the document up to date
pub struct DashboardClient {
    fetcher: Arc<dyn Fetch>,
    store: Arc<dyn KeyValueStore>,
    document: SharedDocument,
    record_limit: Option<usize>,
}

impl DashboardClient {
    pub fn new(fetcher: Arc<dyn Fetch>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            fetcher,
            store,
            document: new_shared_document(),
            record_limit: None,
        }
    }

    /// Render into a custom document instead of the standard page
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Arc::new(RwLock::new(document));
        self
    }

    /// Ask the service for at most `limit` Globals/HOFs
    pub fn with_record_limit(mut self, limit: Option<usize>) -> Self {
        self.record_limit = limit;
        self
    }

    pub fn document(&self) -> SharedDocument {
        Arc::clone(&self.document)
    }

    /// Insert the toggle control and apply the saved preference
    pub fn initialize(&self) {
        let dark_mode = load_dark_mode(self.store.as_ref());
        let mut doc = write_document(&self.document);
        if dark_mode {
            doc.add_root_class(DARK_MODE_CLASS);
        }
        doc.set_toggle(ToggleControl {
            icon: toggle_icon(dark_mode),
            title: TOGGLE_TITLE,
        });
    }

    pub fn dark_mode(&self) -> bool {
        self.document
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .has_root_class(DARK_MODE_CLASS)
    }

    /// Flip dark mode, persist it and return the new state
    pub fn toggle_dark_mode(&self) -> bool {
        let enabled = {
            let mut doc = write_document(&self.document);
            let enabled = doc.toggle_root_class(DARK_MODE_CLASS);
            if let Some(toggle) = doc.toggle_mut() {
                toggle.icon = toggle_icon(enabled);
            }
            enabled
        };

        if let Err(e) = save_dark_mode(self.store.as_ref(), enabled) {
            tracing::warn!(error = %e, "Failed to persist dark mode preference");
        }
        enabled
    }

    /// Start one refresh cycle.
    ///
    /// The three requests are spawned first and `last-updated` is stamped
    /// right after, before any of them has completed. If the stamp fails
    /// the requests keep running detached.
    pub fn refresh(&self) -> Result<RefreshCycle, DashboardError> {
        let cycle = RefreshCycle {
            stats: self.spawn_endpoint(Endpoint::Stats),
            globals: self.spawn_endpoint(Endpoint::Globals),
            hofs: self.spawn_endpoint(Endpoint::Hofs),
        };

        write_document(&self.document).set_text(ids::LAST_UPDATED, local_now())?;
        Ok(cycle)
    }

    fn spawn_endpoint(&self, endpoint: Endpoint) -> JoinHandle<EndpointOutcome> {
        tokio::spawn(fetch_and_render(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.document),
            endpoint,
            endpoint.request_path(self.record_limit),
        ))
    }

    /// Initialize and start polling every `interval`
    pub fn start(self: Arc<Self>, interval: Duration) -> PollHandle {
        self.initialize();

        let (stop_tx, stop_rx) = watch::channel(false);
        let refresh_now = Arc::new(Notify::new());
        let task = tokio::spawn(poll_loop(
            Arc::clone(&self),
            interval,
            stop_rx,
            Arc::clone(&refresh_now),
        ));

        tracing::info!(interval_ms = interval.as_millis() as u64, "Polling started");
        PollHandle {
            stop: stop_tx,
            refresh_now,
            task,
        }
    }
}

/// Control handle of a running poller.
///
/// Dropping the handle stops polling at the next wait point.
#[derive(Debug)]
pub struct PollHandle {
    stop: watch::Sender<bool>,
    refresh_now: Arc<Notify>,
    task: JoinHandle<Result<(), DashboardError>>,
}

impl PollHandle {
    /// Run the next cycle now, or right after the one in flight settles
    pub fn request_refresh(&self) {
        self.refresh_now.notify_one();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the poller to stop and wait for it to exit
    pub async fn stop(self) -> Result<(), DashboardError> {
        let _ = self.stop.send(true);
        self.join().await
    }

    /// Wait for the poller to exit on its own
    pub async fn join(self) -> Result<(), DashboardError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(DashboardError::Task(e.to_string())),
        }
    }
}

async fn poll_loop(
    client: Arc<DashboardClient>,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
    refresh_now: Arc<Notify>,
) -> Result<(), DashboardError> {
    let mut first = true;

    loop {
        if *stop.borrow() {
            break;
        }

        match client.refresh() {
            Ok(cycle) => {
                let in_flight = cycle.abort_handles();
                tokio::select! {
                    report = cycle.settle() => report.log(),
                    _ = stop.changed() => {
                        for handle in in_flight {
                            handle.abort();
                        }
                        break;
                    }
                }
            }
            // Without a first render the page never finished setting up
            Err(e) if first => return Err(e),
            Err(e) => tracing::error!(error = %e, "Refresh failed"),
        }
        first = false;

        // Next tick is armed only once the previous cycle has settled
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = refresh_now.notified() => {
                tracing::debug!("Manual refresh requested");
            }
            _ = stop.changed() => break,
        }
    }

    tracing::info!("Polling stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::{MemoryStore, DARK_MODE_KEY, MOON_ICON, SUN_ICON};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::Semaphore;

    const STATS_JSON: &str = r#"{"TotalGlobals":3,"TotalHofs":1,"TotalValue":120.5,
        "HighestValue":80,"ByType":{"int":3,"str":1},"ByLocation":{"Calypso":3}}"#;
    const GLOBALS_JSON: &str =
        r#"[{"timestamp":1709294400000,"type":"Global","target":"Atrox","value":40.5}]"#;
    const HOFS_JSON: &str =
        r#"{"a":{"timestamp":"2024-03-01T12:00:00Z","type":"HoF","target":"Daikiba","value":80}}"#;

    /// Serves fixed bodies; unknown paths fail as unavailable
    #[derive(Default)]
    struct StubFetcher {
        bodies: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl StubFetcher {
        fn with_body(mut self, path: &str, body: &str) -> Self {
            self.bodies.insert(path.to_string(), body.to_string());
            self
        }

        fn all() -> Self {
            StubFetcher::default()
                .with_body("/api/stats", STATS_JSON)
                .with_body("/api/globals", GLOBALS_JSON)
                .with_body("/api/hofs", HOFS_JSON)
        }

        fn gated(mut self, gate: Arc<Semaphore>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn count(&self, path: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.as_str() == path)
                .count()
        }
    }

    #[async_trait]
    impl Fetch for StubFetcher {
        async fn fetch(&self, path: &str) -> Result<String, FetchError> {
            self.calls.lock().unwrap().push(path.to_string());
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            self.bodies
                .get(path)
                .cloned()
                .ok_or_else(|| FetchError::Unavailable(path.to_string()))
        }
    }

    fn client(fetcher: Arc<StubFetcher>) -> DashboardClient {
        DashboardClient::new(fetcher, Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_initialize_reads_saved_preference() {
        let store = Arc::new(MemoryStore::new());
        store.set(DARK_MODE_KEY, "true").unwrap();
        let client = DashboardClient::new(Arc::new(StubFetcher::default()), store);

        client.initialize();

        let doc = client.document();
        let doc = doc.read().unwrap();
        assert!(doc.has_root_class(DARK_MODE_CLASS));
        assert_eq!(doc.toggle().unwrap().icon, SUN_ICON);
        assert_eq!(doc.toggle().unwrap().title, "Toggle Dark Mode");
    }

    #[test]
    fn test_initialize_without_preference_is_light() {
        let client = client(Arc::new(StubFetcher::default()));
        client.initialize();
        assert!(!client.dark_mode());
        let doc = client.document();
        assert_eq!(doc.read().unwrap().toggle().unwrap().icon, MOON_ICON);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        for saved in ["false", "true"] {
            let store = Arc::new(MemoryStore::new());
            store.set(DARK_MODE_KEY, saved).unwrap();
            let client = DashboardClient::new(Arc::new(StubFetcher::default()), store.clone());
            client.initialize();
            let before = client.dark_mode();
            let icon_before = client.document().read().unwrap().toggle().unwrap().icon;

            assert_eq!(client.toggle_dark_mode(), !before);
            let flipped = if before { "false" } else { "true" };
            assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some(flipped));
            assert_eq!(client.toggle_dark_mode(), before);

            assert_eq!(client.dark_mode(), before);
            assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some(saved));
            assert_eq!(
                client.document().read().unwrap().toggle().unwrap().icon,
                icon_before
            );
        }
    }

    #[tokio::test]
    async fn test_refresh_renders_all_endpoints() {
        let client = client(Arc::new(StubFetcher::all()));
        let report = client.refresh().unwrap().settle().await;
        assert!(report.all_rendered());

        let doc = client.document();
        let doc = doc.read().unwrap();
        assert_eq!(doc.text(ids::TOTAL_GLOBALS), Some("3"));
        assert_eq!(doc.text(ids::TOTAL_VALUE), Some("120.50"));
        assert_eq!(doc.text(ids::HIGHEST_VALUE), Some("80.00"));
        assert_eq!(doc.table(ids::GLOBALS_BY_TYPE).unwrap().len(), 2);
        assert_eq!(doc.table(ids::LATEST_GLOBALS).unwrap().rows()[0].texts()[2], "Atrox");
        assert_eq!(doc.table(ids::LATEST_HOFS).unwrap().rows()[0].texts()[2], "Daikiba");
        assert!(!doc.text(ids::LAST_UPDATED).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_globals_does_not_block_others() {
        let fetcher = StubFetcher::default()
            .with_body("/api/stats", STATS_JSON)
            .with_body("/api/hofs", HOFS_JSON);
        let client = client(Arc::new(fetcher));

        let report = client.refresh().unwrap().settle().await;
        assert!(report.stats.is_rendered());
        assert!(report.hofs.is_rendered());
        assert!(matches!(report.globals, EndpointOutcome::Failed(FetchError::Unavailable(_))));

        let doc = client.document();
        let doc = doc.read().unwrap();
        assert_eq!(doc.text(ids::TOTAL_HOFS), Some("1"));
        assert_eq!(doc.table(ids::LATEST_HOFS).unwrap().len(), 1);
        assert!(doc.table(ids::LATEST_GLOBALS).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_failure() {
        let fetcher = StubFetcher::all().with_body("/api/stats", "<html>oops</html>");
        let client = client(Arc::new(fetcher));

        let report = client.refresh().unwrap().settle().await;
        assert!(matches!(report.stats, EndpointOutcome::Failed(FetchError::Decode { .. })));
        assert!(report.globals.is_rendered());
        assert!(report.hofs.is_rendered());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_stale_data() {
        let fetcher = Arc::new(StubFetcher::all());
        let client = client(fetcher);
        client.refresh().unwrap().settle().await;

        let broken = StubFetcher::default();
        let client = DashboardClient {
            fetcher: Arc::new(broken),
            ..client
        };
        let report = client.refresh().unwrap().settle().await;
        assert!(!report.stats.is_rendered());
        assert_eq!(client.document().read().unwrap().text(ids::TOTAL_GLOBALS), Some("3"));
    }

    #[tokio::test]
    async fn test_last_updated_stamped_before_data_arrives() {
        let gate = Arc::new(Semaphore::new(0));
        let fetcher = Arc::new(StubFetcher::all().gated(gate.clone()));
        let client = client(fetcher);

        let cycle = client.refresh().unwrap();
        {
            let doc = client.document();
            let doc = doc.read().unwrap();
            // The stamp claims freshness although nothing has rendered yet
            assert!(!doc.text(ids::LAST_UPDATED).unwrap().is_empty());
            assert_eq!(doc.text(ids::TOTAL_GLOBALS), Some(""));
            assert!(doc.table(ids::LATEST_GLOBALS).unwrap().is_empty());
        }

        gate.add_permits(3);
        let report = cycle.settle().await;
        assert!(report.all_rendered());
        assert_eq!(client.document().read().unwrap().text(ids::TOTAL_GLOBALS), Some("3"));
    }

    #[tokio::test]
    async fn test_aborted_cycle_reports_cancelled_tasks() {
        let gate = Arc::new(Semaphore::new(0));
        let client = client(Arc::new(StubFetcher::all().gated(gate)));

        let cycle = client.refresh().unwrap();
        cycle.abort();
        let report = cycle.settle().await;
        for (_, outcome) in report.outcomes() {
            assert!(matches!(outcome, EndpointOutcome::Aborted(DashboardError::Task(_))));
        }
        assert_eq!(client.document().read().unwrap().text(ids::TOTAL_GLOBALS), Some(""));
    }

    #[tokio::test]
    async fn test_missing_last_updated_still_issues_requests() {
        let mut page = Document::dashboard_page();
        page.remove(ids::LAST_UPDATED);
        let fetcher = Arc::new(StubFetcher::all());
        let client = client(fetcher.clone()).with_document(page);

        let err = client.refresh().unwrap_err();
        assert_eq!(err, DashboardError::MissingElement(ids::LAST_UPDATED.to_string()));

        for _ in 0..50 {
            if client.document().read().unwrap().text(ids::TOTAL_GLOBALS) == Some("3") {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(fetcher.count("/api/stats"), 1);
        assert_eq!(client.document().read().unwrap().text(ids::TOTAL_GLOBALS), Some("3"));
    }

    #[tokio::test]
    async fn test_render_failure_is_reported_per_endpoint() {
        let mut page = Document::dashboard_page();
        page.remove(ids::LATEST_HOFS);
        let client = client(Arc::new(StubFetcher::all())).with_document(page);

        let report = client.refresh().unwrap().settle().await;
        assert!(report.stats.is_rendered());
        assert!(report.globals.is_rendered());
        assert!(matches!(
            report.hofs,
            EndpointOutcome::Aborted(DashboardError::MissingElement(_))
        ));
    }

    #[tokio::test]
    async fn test_record_limit_is_sent() {
        let fetcher = Arc::new(
            StubFetcher::all()
                .with_body("/api/globals?limit=5", GLOBALS_JSON)
                .with_body("/api/hofs?limit=5", HOFS_JSON),
        );
        let client = client(fetcher.clone()).with_record_limit(Some(5));

        let report = client.refresh().unwrap().settle().await;
        assert!(report.all_rendered());
        assert_eq!(fetcher.count("/api/globals?limit=5"), 1);
        assert_eq!(fetcher.count("/api/hofs?limit=5"), 1);
        assert_eq!(fetcher.count("/api/stats"), 1);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let client = client(Arc::new(StubFetcher::all()));
        client.refresh().unwrap().settle().await;
        let mut first = client.document().read().unwrap().clone();

        client.refresh().unwrap().settle().await;
        let mut second = client.document().read().unwrap().clone();

        // Only the clock stamp may differ
        first.set_text(ids::LAST_UPDATED, "").unwrap();
        second.set_text(ids::LAST_UPDATED, "").unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_refreshes_every_interval() {
        let fetcher = Arc::new(StubFetcher::all());
        let client = Arc::new(client(fetcher.clone()));

        let handle = client.clone().start(DEFAULT_REFRESH_INTERVAL);
        tokio::time::sleep(Duration::from_secs(95)).await;

        // t = 0, 30, 60, 90
        assert_eq!(fetcher.count("/api/stats"), 4);
        assert_eq!(fetcher.count("/api/hofs"), 4);
        assert!(client.document().read().unwrap().toggle().is_some());

        handle.stop().await.unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(fetcher.count("/api/stats"), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_never_overlaps_cycles() {
        let gate = Arc::new(Semaphore::new(0));
        let fetcher = Arc::new(StubFetcher::all().gated(gate.clone()));
        let client = Arc::new(client(fetcher.clone()));

        let handle = client.start(DEFAULT_REFRESH_INTERVAL);
        tokio::time::sleep(Duration::from_secs(95)).await;
        // First cycle is still pending, no new requests were issued
        assert_eq!(fetcher.count("/api/stats"), 1);

        gate.add_permits(1_000);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.count("/api/stats"), 1);

        // Next tick is armed 30s after the first cycle settled
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fetcher.count("/api/stats"), 2);

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_manual_refresh() {
        let fetcher = Arc::new(StubFetcher::all());
        let client = Arc::new(client(fetcher.clone()));

        let handle = client.start(DEFAULT_REFRESH_INTERVAL);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.count("/api/globals"), 1);

        handle.request_refresh();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.count("/api/globals"), 2);

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_stop_aborts_in_flight_cycle() {
        let gate = Arc::new(Semaphore::new(0));
        let fetcher = Arc::new(StubFetcher::all().gated(gate.clone()));
        let client = Arc::new(client(fetcher.clone()));

        let handle = client.clone().start(DEFAULT_REFRESH_INTERVAL);
        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.stop().await.unwrap();

        gate.add_permits(1_000);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(client.document().read().unwrap().text(ids::TOTAL_GLOBALS), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_fails_when_first_refresh_fails() {
        let client = Arc::new(client(Arc::new(StubFetcher::all())).with_document(Document::new()));

        let handle = client.start(DEFAULT_REFRESH_INTERVAL);
        let err = handle.join().await.unwrap_err();
        assert_eq!(err, DashboardError::MissingElement(ids::LAST_UPDATED.to_string()));
    }
}
