//! Suggested index fetch.
//!
//! Shapes and suggestions decode as one body: a single bad element (a
//! negative `avgMs`, say, since the metrics are unsigned) discards the whole
//! response and nothing is reported for it.

use atlas_advisor_types::{IndexField, Namespace, SuggestedIndexes};

use super::Advisor;
use crate::report::{Endpoint, SuggestedIndexEntry};
use crate::AtlasError;

impl Advisor {
    /// Report every suggested index for the process, once per impacted shape
    /// present in the same response.
    ///
    /// Error handling matches [`Advisor::fetch_slow_queries`]. Returns the
    /// number of records reported.
    pub async fn fetch_suggested_indexes(
        &self,
        scope: &str,
        since_ms: u64,
    ) -> Result<usize, AtlasError> {
        let uri = format!("{}{}?since={}", scope, Endpoint::SuggestedIndexes, since_ms);
        let response = self.transport.get(&uri).await?;

        let data: SuggestedIndexes = response.decode().unwrap_or_else(|e| {
            self.reporter.error(Endpoint::SuggestedIndexes, &e);
            SuggestedIndexes::default()
        });

        let mut reported = 0;
        for suggestion in &data.suggested_indexes {
            let namespace = match Namespace::parse(&suggestion.namespace) {
                Ok(namespace) => namespace,
                Err(e) => {
                    self.reporter.error(Endpoint::SuggestedIndexes, &e.into());
                    continue;
                }
            };

            let index = index_spec(&suggestion.index).unwrap_or_else(|e| {
                self.reporter.error(Endpoint::SuggestedIndexes, &e);
                String::new()
            });

            for (impact, shape) in data.impacted_shapes(suggestion) {
                self.reporter.suggested_index(&SuggestedIndexEntry {
                    id: suggestion.id.clone(),
                    impact: impact.to_string(),
                    index: index.clone(),
                    database: namespace.database.to_string(),
                    collection: namespace.collection.to_string(),
                    weight: suggestion.weight,
                    avg_ms: shape.avg_ms,
                    count: shape.count,
                    inefficiency_score: shape.inefficiency_score,
                });
                reported += 1;
            }
        }
        Ok(reported)
    }
}

/// Render an index key specification as the concatenated JSON encodings of
/// its elements, with no separator and no enclosing brackets.
///
/// `[{"a":1},{"b":-1}]` renders as `{"a":1}{"b":-1}`.
pub fn index_spec(fields: &[IndexField]) -> Result<String, AtlasError> {
    let mut spec = String::new();
    for field in fields {
        spec.push_str(&serde_json::to_string(field)?);
    }
    Ok(spec)
}
