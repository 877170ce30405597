//! Slow query log fetch.
//!
//! A body that fails to decode yields no records at all, even when only one
//! element carried a bad field. Numeric metrics on the decoded records are
//! unsigned, so a negative value is a decode failure too.

use atlas_advisor_types::{Namespace, SlowQuery, SlowQueryLogs};

use super::Advisor;
use crate::report::{Endpoint, SlowQueryEntry};
use crate::AtlasError;

impl Advisor {
    /// Report every slow query logged on the process since `since_ms`.
    ///
    /// `scope` is the process-scoped base from [`Advisor::process_scope`].
    /// Only transport failures are returned; a bad status or body is reported
    /// and yields no records. Returns the number of records reported.
    pub async fn fetch_slow_queries(
        &self,
        scope: &str,
        since_ms: u64,
    ) -> Result<usize, AtlasError> {
        let uri = format!("{}{}?since={}", scope, Endpoint::SlowQueryLogs, since_ms);
        let response = self.transport.get(&uri).await?;

        let logs: SlowQueryLogs = response.decode().unwrap_or_else(|e| {
            self.reporter.error(Endpoint::SlowQueryLogs, &e);
            SlowQueryLogs::default()
        });

        let mut reported = 0;
        for query in &logs.slow_queries {
            match slow_query_entry(query) {
                Ok(entry) => {
                    self.reporter.slow_query(&entry);
                    reported += 1;
                }
                Err(e) => self.reporter.error(Endpoint::SlowQueryLogs, &e),
            }
        }
        Ok(reported)
    }
}

fn slow_query_entry(query: &SlowQuery) -> Result<SlowQueryEntry, AtlasError> {
    let namespace = Namespace::parse(&query.namespace)?;
    Ok(SlowQueryEntry {
        line: query.line.clone(),
        database: namespace.database.to_string(),
        collection: namespace.collection.to_string(),
    })
}
