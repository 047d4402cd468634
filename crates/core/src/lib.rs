//! Core library for dealmap
//!
//! This crate implements the **Functional Core** of the dealmap client,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`dealmap_core`** (this crate): Pure transformation functions with zero I/O
//! - **`dealmap`**: the HTTP client, configuration, CLI and MCP server (the Imperative Shell)
//!
//! Everything here takes a response body or a set of options and returns plain
//! data. No function touches the network or the filesystem, so every rule is
//! tested against fixture XML.
//!
//! # Module Organization
//!
//! - [`inflector`]: tag name to snake-case key normalization
//! - [`xml`]: owned element tree built from `quick-xml` events
//! - [`response`]: search and details responses to [`AttributeSet`]s
//! - [`attributes`]: the record and search result types
//! - [`params`]: query parameter assembly and API key injection
//!
//! # Example Usage
//!
//! ```rust
//! use dealmap_core::response::{transform_search_response, DEAL_TAG};
//!
//! let body = r#"<DealSearchResults>
//!   <Results>
//!     <Deal><ID> 5-ABC </ID><BusinessName>Corner Cafe</BusinessName></Deal>
//!   </Results>
//!   <TotalResults>37</TotalResults>
//! </DealSearchResults>"#;
//!
//! let result = transform_search_response(body, DEAL_TAG).unwrap();
//!
//! assert_eq!(result.total, 37);
//! assert_eq!(result.records[0].get("id"), Some("5-ABC"));
//! assert_eq!(result.records[0].get("business_name"), Some("Corner Cafe"));
//! ```

pub mod attributes;
pub mod error;
pub mod inflector;
pub mod params;
pub mod response;
pub mod xml;

pub use attributes::{AttributeSet, SearchResult};
pub use error::ParseError;
pub use params::{QueryParams, SearchOptions};
