//! # atlas-advisor
//!
//! Reports slow queries and suggested indexes from the MongoDB Atlas
//! Performance Advisor for the primary of a project.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Advisor                             │
//! │  resolve_primary ──▶ fetch_slow_queries                      │
//! │         │        └─▶ fetch_suggested_indexes                 │
//! │         ▼                        │                           │
//! │  ┌─────────────┐          ┌──────▼──────┐                    │
//! │  │  Transport  │          │  Reporter   │──▶ tracing events  │
//! │  │ (digest GET)│          │   (sink)    │                    │
//! │  └─────────────┘          └─────────────┘                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`transport`]**: the [`Transport`] trait and the digest-authenticated
//!   [`DigestTransport`]
//! - **[`advisor`]**: primary resolution, the two Performance Advisor fetches
//!   and the run orchestration
//! - **[`report`]**: the [`Reporter`] sink and the `tracing`-backed
//!   [`TracingReporter`]
//! - **[`config`]**: layered configuration via the `config` crate
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! atlas-advisor --project-id 5e2211c17a3e5a48f5497de3 \
//!     --public-key abcdefgh --private-key 00000000-0000-0000-0000-000000000000 \
//!     --since 24
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use atlas_advisor::{Advisor, DigestTransport, FetchMode, TracingReporter};
//!
//! # tokio_test::block_on(async {
//! let transport = DigestTransport::builder()
//!     .credentials("public-key", "private-key")
//!     .build()?;
//! let advisor = Advisor::new(
//!     Arc::new(transport),
//!     Arc::new(TracingReporter),
//!     "https://cloud.mongodb.com/api/atlas/v1.0",
//! );
//! advisor.run("5e2211c17a3e5a48f5497de3", 24, FetchMode::Sequential).await?;
//! # Ok::<(), atlas_advisor::AtlasError>(())
//! # }).unwrap();
//! ```

pub mod advisor;
pub mod config;
pub mod error;
pub mod report;
pub mod transport;

pub use advisor::{index_spec, since_millis, Advisor, FetchMode};
pub use crate::config::{AdvisorConfig, ConfigOverrides};
pub use error::AtlasError;
pub use report::{Endpoint, Reporter, SlowQueryEntry, SuggestedIndexEntry, TracingReporter};
pub use transport::{ApiResponse, DigestTransport, DigestTransportBuilder, Transport};

// Re-export types for convenience
pub use atlas_advisor_types::{
    IndexField, Namespace, NamespaceError, Process, ProcessList, QueryShape, SlowQuery,
    SlowQueryLogs, SuggestedIndex, SuggestedIndexes,
};
