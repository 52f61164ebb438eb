//! Attribute Search Harness
//!
//! Drives an external entity-resolution search service through a long,
//! deterministic sweep of "search by attributes" calls.
//!
//! ## Pipeline
//!
//! Fixtures -> Scenario assembly -> Request building -> Worker-thread sweep
//!
//! 1. [`fixtures`] writes the CSV files the external repository manager
//!    loads, from the tables in [`catalog`].
//! 2. [`scenario::ScenarioAssembler`] cross-products the catalog's criteria
//!    groups with result-type subsets, feature modes and tri-state option
//!    variants from [`variants`], cycled with [`cyclic::CyclicSelector`].
//! 3. [`query`] renders each scenario as a `GET /entities?attrs=...` URI.
//! 4. [`runner::SweepRunner`] sends them through a [`runner::SearchBackend`]
//!    on a dedicated worker thread and compares result counts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use attr_search_harness::{catalog, HarnessConfig, RecordingBackend, SweepRunner};
//!
//! let config = HarnessConfig::default();
//! let scenarios = config.assembler().assemble(&catalog::search_groups()).unwrap();
//! let (summary, _backend) = SweepRunner::new(&config)
//!     .run_on_worker(Arc::new(scenarios), RecordingBackend::new())
//!     .unwrap();
//! assert!(summary.all_passed());
//! ```

// Core error handling
pub mod error;

// Combinatorics
pub mod cyclic;
pub mod variants;

// Request model
pub mod criteria;
pub mod options;
pub mod query;

// Sweep construction and execution
pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod runner;
pub mod scenario;

pub use config::HarnessConfig;
pub use criteria::{criterion, Criterion, SearchCriteria};
pub use cyclic::CyclicSelector;
pub use error::{HarnessError, Result};
pub use fixtures::{prepare_fixtures, FixtureManifest, FixtureTable};
pub use options::{EffectiveOptions, SearchOptions};
pub use query::RequestContext;
pub use runner::{
    HttpSearchBackend, RecordingBackend, RunSummary, SearchBackend, SearchRequest, SweepRunner,
};
pub use scenario::{ExpectedCounts, ScenarioAssembler, SearchGroup, SearchScenario};
pub use variants::{boolean_variants, TriState, Variant};

pub use search_types;
