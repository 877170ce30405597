//! Slow query log entries.

/// A single slow operation reported by the Performance Advisor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlowQuery {
    /// The raw log line for the operation.
    pub line: String,
    /// `database.collection` the operation ran against.
    pub namespace: String,
}

/// Response body of the `slowQueryLogs` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SlowQueryLogs {
    pub slow_queries: Vec<SlowQuery>,
}
