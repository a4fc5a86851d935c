//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of all external collaborator
//! traits, allowing comprehensive testing without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediarr_core::testing::{MockCatalogSearch, MockMetadataSearch, fixtures};
//!
//! let catalog = MockCatalogSearch::new();
//! let metadata = MockMetadataSearch::new();
//!
//! // Configure mock responses
//! catalog.set_items(vec![fixtures::catalog_item("Tatort", "Tatort (S01/E01)")]).await;
//!
//! // Use in a generator/classifier...
//! ```

mod mock_catalog_search;
mod mock_clock;
mod mock_manifest;
mod mock_metadata_search;

pub mod fixtures;

pub use mock_catalog_search::MockCatalogSearch;
pub use mock_clock::MockClock;
pub use mock_manifest::MockManifestSource;
pub use mock_metadata_search::MockMetadataSearch;
