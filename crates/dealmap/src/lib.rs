//! Client for The Dealmap deal and business search API.
//!
//! This crate is the I/O half of dealmap: it owns the HTTP transport and the
//! configuration, and hands response bodies to [`dealmap_core`] for the
//! XML-to-record mapping.
//!
//! ```rust,no_run
//! use dealmap::{Client, SearchOptions};
//!
//! # async fn example() -> dealmap::Result<()> {
//! let client = Client::new("your-api-key")?;
//!
//! let result = client
//!     .search_deals(&SearchOptions::location("Miami, FL").to_params())
//!     .await?;
//! println!("{} of {} deals", result.records.len(), result.total);
//!
//! if let Some(id) = result.records.first().and_then(|deal| deal.get("id")) {
//!     let deal = client.deal_details(id, &Default::default()).await?;
//!     println!("{:?}", deal.get("title"));
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::Client;
pub use config::{ClientConfig, API_KEY_VAR, BASE_URL_VAR, DEFAULT_BASE_URL};
pub use error::{Error, ErrorKind, Result};

pub use dealmap_core::{AttributeSet, ParseError, QueryParams, SearchOptions, SearchResult};
