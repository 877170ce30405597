//! # atlas-advisor-types
//!
//! Response schemas for the MongoDB Atlas Performance Advisor API. These are the
//! read-only records the `atlas-advisor` crate decodes from each endpoint and
//! discards once they have been reported.
//!
//! ## Features
//!
//! - `serde`: derive `Deserialize`/`Serialize` using the API's camelCase field names
//!
//! ## Example
//!
//! ```rust
//! use atlas_advisor_types::{Namespace, Process, ProcessList};
//!
//! let processes = ProcessList {
//!     results: vec![
//!         Process::new("shard-00-00:27017", "REPLICA_SECONDARY"),
//!         Process::new("shard-00-01:27017", "REPLICA_PRIMARY"),
//!     ],
//! };
//! assert_eq!(processes.primary().map(|p| p.id.as_str()), Some("shard-00-01:27017"));
//!
//! let ns = Namespace::parse("sales.orders").unwrap();
//! assert_eq!(ns.database, "sales");
//! assert_eq!(ns.collection, "orders");
//! ```

mod namespace;
mod process;
mod slow_query;
mod suggested_index;

pub use namespace::*;
pub use process::*;
pub use slow_query::*;
pub use suggested_index::*;
