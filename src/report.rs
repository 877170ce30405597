//! Output of a Performance Advisor run.
//!
//! Every record the advisor finds is handed to a [`Reporter`]. The binary uses
//! [`TracingReporter`], which turns records into structured `tracing` events
//! for whatever subscriber the caller installed; embedders can supply their
//! own sink.

use std::fmt;

use tracing::{debug, error, info};

use crate::AtlasError;

/// The endpoint a record or error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Processes,
    SlowQueryLogs,
    SuggestedIndexes,
}

impl Endpoint {
    /// Path segment of the endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Processes => "processes",
            Endpoint::SlowQueryLogs => "slowQueryLogs",
            Endpoint::SuggestedIndexes => "suggestedIndexes",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A slow operation, with its namespace split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlowQueryEntry {
    pub line: String,
    pub database: String,
    pub collection: String,
}

/// A suggested index joined with one of the shapes it impacts.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestedIndexEntry {
    /// Suggestion identifier.
    pub id: String,
    /// Identifier of the matched shape.
    pub impact: String,
    /// Concatenated JSON encodings of the index key specification.
    pub index: String,
    pub database: String,
    pub collection: String,
    pub weight: f64,
    pub avg_ms: u64,
    pub count: u64,
    pub inefficiency_score: u64,
}

/// Sink for everything a run produces.
pub trait Reporter: Send + Sync {
    /// The primary process was identified.
    fn primary_resolved(&self, process_id: &str);

    /// A slow query was found.
    fn slow_query(&self, entry: &SlowQueryEntry);

    /// A suggested index matched a shape.
    fn suggested_index(&self, entry: &SuggestedIndexEntry);

    /// A recoverable error; the run continues.
    fn error(&self, endpoint: Endpoint, error: &AtlasError);
}

/// Reporter that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn primary_resolved(&self, process_id: &str) {
        debug!(process_id, "Primary database found");
    }

    fn slow_query(&self, entry: &SlowQueryEntry) {
        info!(
            line = %entry.line,
            database = %entry.database,
            collection = %entry.collection,
            "Slow Query found"
        );
    }

    fn suggested_index(&self, entry: &SuggestedIndexEntry) {
        info!(
            id = %entry.id,
            impact = %entry.impact,
            index = %entry.index,
            database = %entry.database,
            collection = %entry.collection,
            weight = entry.weight,
            avgMs = entry.avg_ms,
            count = entry.count,
            inefficiencyScore = entry.inefficiency_score,
            "Suggested index found."
        );
    }

    fn error(&self, endpoint: Endpoint, error: &AtlasError) {
        error!(endpoint = %endpoint, error = %error, "Performance Advisor request failed");
    }
}
