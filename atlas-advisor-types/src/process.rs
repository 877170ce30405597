//! Process listing for a project.

/// One `mongod`/`mongos` process in an Atlas project.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Process {
    /// Process identifier (`hostname:port`), used in per-process URIs.
    pub id: String,
    /// Type label such as `REPLICA_PRIMARY` or `REPLICA_SECONDARY`.
    pub type_name: String,
}

impl Process {
    /// Create a process record.
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
        }
    }

    /// Whether the type label names a primary, ignoring case.
    pub fn is_primary(&self) -> bool {
        self.type_name.to_lowercase().contains("primary")
    }
}

/// Response body of the processes endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProcessList {
    /// Processes in response order.
    pub results: Vec<Process>,
}

impl ProcessList {
    /// The first primary in response order.
    pub fn primary(&self) -> Option<&Process> {
        self.results.iter().find(|p| p.is_primary())
    }
}
