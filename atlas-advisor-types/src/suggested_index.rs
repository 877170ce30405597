//! Query shapes and the index suggestions that reference them.

use std::collections::BTreeMap;

/// One element of an index key specification: a single `field -> direction`
/// pair (`1` ascending, `-1` descending).
pub type IndexField = BTreeMap<String, i32>;

/// Execution statistics for one sampled operation of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct OperationStats {
    /// Duration in milliseconds.
    pub ms: u64,
    pub n_returned: u64,
    pub n_scanned: u64,
    /// Unix timestamp in milliseconds.
    pub ts: i64,
}

/// A sampled operation belonging to a query shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShapeOperation {
    /// The raw log line of the operation.
    pub raw: String,
    pub stats: OperationStats,
}

/// A normalized query pattern with aggregated statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct QueryShape {
    pub id: String,
    pub namespace: String,
    /// Average execution time in milliseconds.
    pub avg_ms: u64,
    /// Number of sampled operations with this shape.
    pub count: u64,
    /// Average ratio of documents scanned to documents returned.
    pub inefficiency_score: u64,
    pub operations: Vec<ShapeOperation>,
}

/// An index recommendation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SuggestedIndex {
    pub id: String,
    /// Identifiers of the shapes this index would improve.
    pub impact: Vec<String>,
    /// Ordered key specification.
    pub index: Vec<IndexField>,
    pub namespace: String,
    /// Relative benefit of the index compared to the other suggestions.
    pub weight: f64,
}

/// Response body of the `suggestedIndexes` endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SuggestedIndexes {
    pub shapes: Vec<QueryShape>,
    pub suggested_indexes: Vec<SuggestedIndex>,
}

impl SuggestedIndexes {
    /// Pair each impact identifier of `suggestion` with every shape carrying
    /// that identifier.
    ///
    /// Order follows the impact list, then shape order. Duplicate shapes or
    /// impacts produce duplicate pairs.
    pub fn impacted_shapes<'a>(
        &'a self,
        suggestion: &'a SuggestedIndex,
    ) -> impl Iterator<Item = (&'a str, &'a QueryShape)> + 'a {
        suggestion.impact.iter().flat_map(move |impact| {
            self.shapes
                .iter()
                .filter(move |shape| shape.id == *impact)
                .map(move |shape| (impact.as_str(), shape))
        })
    }
}
