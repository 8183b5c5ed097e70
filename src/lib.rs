//! # BBC Monitoring
//!
//! A client for the [BBC Monitoring](https://monitoring.bbc.co.uk) API.
//!
//! - Logs in once with credentials read from a JSON key file
//! - Fetches products (articles) by id and searches headlines over the same
//!   cookie-backed session
//! - Extracts the plain body text from an article's HTML
//! - Maps API status codes to typed errors ([`ApiError`]), never leaking the
//!   password into messages or logs
//!
//! ## Usage
//!
//! ```ignore
//! use bbc_monitoring::{ClientConfig, MonitoringClient, extract_body_text};
//!
//! let client = MonitoringClient::connect(&ClientConfig::default()).await?;
//! let hits = client.search_headlines("wildfire", Some(5)).await?;
//! let article = client.fetch_by_id("1ds9ezq2").await?;
//! println!("{}", extract_body_text(&article)?);
//! client.end_session().await;
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod parse;
pub mod session;
pub mod utils;

pub use client::MonitoringClient;
pub use config::ClientConfig;
pub use credentials::{Credentials, MaskedCredentials};
pub use error::{ApiError, map_status};
pub use models::{Article, SearchResult};
pub use parse::extract_body_text;
pub use session::Session;
