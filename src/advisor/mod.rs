//! Performance Advisor queries for the primary of an Atlas project.
//!
//! A run is a single pass:
//!
//! ```text
//!  processes ──▶ primary id ──┬──▶ slowQueryLogs?since=…    ──▶ Reporter
//!                             └──▶ suggestedIndexes?since=… ──▶ Reporter
//! ```
//!
//! Failing to find the primary, or any transport failure, ends the run with an
//! error. Unexpected statuses, undecodable bodies and malformed records are
//! handed to the [`Reporter`] and the run carries on.

mod primary;
mod slow_queries;
mod suggested_indexes;

#[cfg(test)]
pub(crate) mod testing;

pub use suggested_indexes::index_spec;

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::report::{Endpoint, Reporter};
use crate::transport::Transport;
use crate::AtlasError;

/// How the slow-query and suggested-index fetches are scheduled once the
/// primary is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Slow queries first, then suggested indexes.
    #[default]
    Sequential,
    /// Both fetches at once, joined before the run finishes. Records from the
    /// two endpoints may interleave.
    Concurrent,
}

/// Queries the Performance Advisor through a [`Transport`] and hands every
/// result to a [`Reporter`].
#[derive(Clone)]
pub struct Advisor {
    transport: Arc<dyn Transport>,
    reporter: Arc<dyn Reporter>,
    base_url: String,
}

impl Advisor {
    /// Create an advisor rooted at `base_url`
    /// (e.g. `https://cloud.mongodb.com/api/atlas/v1.0`).
    pub fn new(
        transport: Arc<dyn Transport>,
        reporter: Arc<dyn Reporter>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            reporter,
            base_url,
        }
    }

    /// URI of the process listing for a project.
    pub fn processes_uri(&self, project_id: &str) -> String {
        format!(
            "{}/groups/{}/{}/",
            self.base_url,
            project_id,
            Endpoint::Processes
        )
    }

    /// Base URI of the Performance Advisor endpoints for one process.
    ///
    /// Ends with `/` so endpoint names can be appended directly.
    pub fn process_scope(&self, project_id: &str, process_id: &str) -> String {
        format!(
            "{}/groups/{}/processes/{}/performanceAdvisor/",
            self.base_url, project_id, process_id
        )
    }

    /// Resolve the primary of `project_id`, then report slow queries and
    /// suggested indexes from the last `since_hours` hours.
    pub async fn run(
        &self,
        project_id: &str,
        since_hours: u64,
        mode: FetchMode,
    ) -> Result<(), AtlasError> {
        let since = since_millis(SystemTime::now(), since_hours);

        let primary = self.resolve_primary(project_id).await?;
        let scope = self.process_scope(project_id, &primary);

        let (slow, suggested) = match mode {
            FetchMode::Sequential => {
                let slow = self.fetch_slow_queries(&scope, since).await?;
                let suggested = self.fetch_suggested_indexes(&scope, since).await?;
                (slow, suggested)
            }
            FetchMode::Concurrent => {
                let (slow, suggested) = tokio::join!(
                    self.fetch_slow_queries(&scope, since),
                    self.fetch_suggested_indexes(&scope, since)
                );
                (slow?, suggested?)
            }
        };

        debug!(
            primary = %primary,
            since,
            slow_queries = slow,
            suggested_indexes = suggested,
            "Performance Advisor run complete"
        );
        Ok(())
    }
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("transport", &self.transport)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Unix timestamp in milliseconds `hours` before `now`, saturating at zero.
pub fn since_millis(now: SystemTime, hours: u64) -> u64 {
    let window = Duration::from_secs(hours.saturating_mul(3600));
    now.checked_sub(window)
        .and_then(|start| start.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::testing::{CollectingReporter, Event, Reply, ScriptedTransport};
    use super::*;

    const PROCESSES: &str = r#"{"results":[
        {"id":"host-00:27017","typeName":"REPLICA_SECONDARY"},
        {"id":"host-01:27017","typeName":"REPLICA_PRIMARY"}
    ]}"#;

    const SLOW: &str = r#"{"slowQueries":[{"line":"db.coll1.find()","namespace":"db1.coll1"}]}"#;

    const SUGGESTED: &str = r#"{
        "shapes":[{"id":"shapeA","namespace":"db1.coll1","avgMs":10,"count":2,"inefficiencyScore":5}],
        "suggestedIndexes":[{"id":"s1","impact":["shapeA"],"index":[{"field1":1}],"namespace":"db1.coll1","weight":1.0}]
    }"#;

    fn advisor(transport: &Arc<ScriptedTransport>, reporter: &Arc<CollectingReporter>) -> Advisor {
        Advisor::new(
            transport.clone(),
            reporter.clone(),
            "https://atlas.test/api/atlas/v1.0/",
        )
    }

    #[test]
    fn test_uris() {
        let advisor = advisor(
            &Arc::new(ScriptedTransport::default()),
            &Arc::new(CollectingReporter::default()),
        );
        assert_eq!(
            advisor.processes_uri("g1"),
            "https://atlas.test/api/atlas/v1.0/groups/g1/processes/"
        );
        assert_eq!(
            advisor.process_scope("g1", "host:27017"),
            "https://atlas.test/api/atlas/v1.0/groups/g1/processes/host:27017/performanceAdvisor/"
        );
    }

    #[test]
    fn test_since_millis() {
        let now = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        assert_eq!(since_millis(now, 24), 1_700_000_000_123 - 24 * 3600 * 1000);
        assert_eq!(since_millis(now, 0), 1_700_000_000_123);
    }

    #[test]
    fn test_since_millis_round_trip() {
        let now = SystemTime::now();
        let since = since_millis(now, 24);
        let now_ms = now.duration_since(UNIX_EPOCH).unwrap().as_millis() as u64;
        let hours = (now_ms - since) as f64 / 3_600_000.0;
        assert!((hours - 24.0).abs() < 1.0 / 3600.0);
    }

    #[test]
    fn test_since_millis_saturates() {
        let now = UNIX_EPOCH + Duration::from_secs(60);
        assert_eq!(since_millis(now, 1), 0);
        assert_eq!(since_millis(now, u64::MAX), 0);
    }

    #[tokio::test]
    async fn test_run_sequential() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .reply(Endpoint::Processes, Reply::json(PROCESSES))
                .reply(Endpoint::SlowQueryLogs, Reply::json(SLOW))
                .reply(Endpoint::SuggestedIndexes, Reply::json(SUGGESTED)),
        );
        let reporter = Arc::new(CollectingReporter::default());

        advisor(&transport, &reporter)
            .run("g1", 24, FetchMode::Sequential)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0], "https://atlas.test/api/atlas/v1.0/groups/g1/processes/");
        assert!(requests[1].starts_with(
            "https://atlas.test/api/atlas/v1.0/groups/g1/processes/host-01:27017/performanceAdvisor/slowQueryLogs?since="
        ));
        assert!(requests[2].starts_with(
            "https://atlas.test/api/atlas/v1.0/groups/g1/processes/host-01:27017/performanceAdvisor/suggestedIndexes?since="
        ));

        let events = reporter.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], Event::Primary("host-01:27017".to_string()));
        assert!(matches!(events[1], Event::SlowQuery(_)));
        assert!(matches!(events[2], Event::SuggestedIndex(_)));
    }

    #[tokio::test]
    async fn test_run_sends_since_window() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .reply(Endpoint::Processes, Reply::json(PROCESSES))
                .reply(Endpoint::SlowQueryLogs, Reply::json(SLOW))
                .reply(Endpoint::SuggestedIndexes, Reply::json(SUGGESTED)),
        );
        let reporter = Arc::new(CollectingReporter::default());
        let before = since_millis(SystemTime::now(), 24);

        advisor(&transport, &reporter)
            .run("g1", 24, FetchMode::Sequential)
            .await
            .unwrap();

        let after = since_millis(SystemTime::now(), 24);
        for uri in &transport.requests()[1..] {
            let since: u64 = uri.rsplit("since=").next().unwrap().parse().unwrap();
            assert!(since >= before && since <= after);
        }
    }

    #[tokio::test]
    async fn test_no_primary_aborts_before_fetching() {
        let transport = Arc::new(ScriptedTransport::default().reply(
            Endpoint::Processes,
            Reply::json(r#"{"results":[{"id":"h:1","typeName":"REPLICA_SECONDARY"}]}"#),
        ));
        let reporter = Arc::new(CollectingReporter::default());

        let err = advisor(&transport, &reporter)
            .run("g1", 24, FetchMode::Sequential)
            .await
            .unwrap_err();

        assert!(matches!(err, AtlasError::NoPrimary));
        assert_eq!(transport.requests().len(), 1);
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_during_resolution_aborts() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .reply(Endpoint::Processes, Reply::ConnectionRefused)
                .reply(Endpoint::SlowQueryLogs, Reply::json(SLOW))
                .reply(Endpoint::SuggestedIndexes, Reply::json(SUGGESTED)),
        );
        let reporter = Arc::new(CollectingReporter::default());

        for mode in [FetchMode::Sequential, FetchMode::Concurrent] {
            let err = advisor(&transport, &reporter)
                .run("g1", 24, mode)
                .await
                .unwrap_err();
            assert!(matches!(err, AtlasError::Connection(_)));
        }

        assert!(transport
            .requests()
            .iter()
            .all(|uri| uri.ends_with("/groups/g1/processes/")));
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_does_not_stop_run() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .reply(Endpoint::Processes, Reply::json(PROCESSES))
                .reply(Endpoint::SlowQueryLogs, Reply::json("not json"))
                .reply(Endpoint::SuggestedIndexes, Reply::json(SUGGESTED)),
        );
        let reporter = Arc::new(CollectingReporter::default());

        advisor(&transport, &reporter)
            .run("g1", 24, FetchMode::Sequential)
            .await
            .unwrap();

        let events = reporter.events();
        assert!(matches!(events[1], Event::Error(Endpoint::SlowQueryLogs, _)));
        assert!(matches!(events[2], Event::SuggestedIndex(_)));
    }

    #[tokio::test]
    async fn test_sequential_transport_failure_skips_second_fetch() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .reply(Endpoint::Processes, Reply::json(PROCESSES))
                .reply(Endpoint::SlowQueryLogs, Reply::ConnectionRefused)
                .reply(Endpoint::SuggestedIndexes, Reply::json(SUGGESTED)),
        );
        let reporter = Arc::new(CollectingReporter::default());

        let err = advisor(&transport, &reporter)
            .run("g1", 24, FetchMode::Sequential)
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(reporter.suggested_indexes().len(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_runs_both_fetches() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .reply(Endpoint::Processes, Reply::json(PROCESSES))
                .reply(Endpoint::SlowQueryLogs, Reply::json(SLOW))
                .reply(Endpoint::SuggestedIndexes, Reply::json(SUGGESTED)),
        );
        let reporter = Arc::new(CollectingReporter::default());

        advisor(&transport, &reporter)
            .run("g1", 24, FetchMode::Concurrent)
            .await
            .unwrap();

        assert_eq!(transport.requests().len(), 3);
        assert_eq!(reporter.slow_queries().len(), 1);
        assert_eq!(reporter.suggested_indexes().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_failure_is_isolated() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .reply(Endpoint::Processes, Reply::json(PROCESSES))
                .reply(Endpoint::SlowQueryLogs, Reply::ConnectionRefused)
                .reply(Endpoint::SuggestedIndexes, Reply::json(SUGGESTED)),
        );
        let reporter = Arc::new(CollectingReporter::default());

        let err = advisor(&transport, &reporter)
            .run("g1", 24, FetchMode::Concurrent)
            .await
            .unwrap_err();

        assert!(matches!(err, AtlasError::Connection(_)));
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(reporter.suggested_indexes().len(), 1);
    }
}
