//! # rest-connection
//!
//! Resource routing, pagination and envelope normalization for paginated,
//! resource-oriented REST APIs.
//!
//! ## Overview
//!
//! A concrete API integration declares only what differs per API: its base
//! URI, the field list responses keep their records under, and how to read
//! the total page count. In return it gets:
//!
//! - CRUD operations on any resource selected by name at call time
//! - [`each`](rest::Resource::each), which walks a whole collection page by page
//! - `{"data": ...}` envelope unwrapping into a uniform [`rest::Normalized`] shape
//! - A pause after every response, either chosen by the integration or random
//! - Resource-specific delegates that override individual operations
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use rest_connection::{Connection, ConnectionConfig, DelayRange};
//! use rest_connection::rest::{EndpointTemplates, Integration, ResourceResponse};
//!
//! struct Crm;
//!
//! impl EndpointTemplates for Crm {}
//!
//! impl Integration for Crm {
//!     fn base_uri(&self) -> &str {
//!         "https://crm.example.com/api"
//!     }
//!
//!     fn list_name(&self) -> &str {
//!         "contacts"
//!     }
//!
//!     fn total_pages(&self, response: &ResourceResponse) -> u64 {
//!         response
//!             .field("pages")
//!             .and_then(serde_json::Value::as_u64)
//!             .unwrap_or(1)
//!     }
//!
//!     fn resource_names(&self) -> Option<&[&str]> {
//!         Some(&["contacts", "deals"])
//!     }
//! }
//!
//! let config = ConnectionConfig::builder()
//!     .delay_range(DelayRange::new(Duration::from_millis(100), Duration::from_millis(300)).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let connection = Connection::new(Crm, config).unwrap();
//! assert!(connection.select("contacts").is_ok());
//! assert!(connection.select("tickets").is_err());
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use rest_connection::rest::Resource;
//! use serde_json::json;
//!
//! let contacts = connection.select("contacts")?;
//!
//! let page = contacts.list(None).await?;
//! let one = contacts.get("42").await?;
//! contacts.post(json!({"name": "Ada"})).await?;
//! contacts.delete("42").await?;
//!
//! contacts
//!     .each(&mut |contact| {
//!         println!("{contact}");
//!         Ok(())
//!     })
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden retries**: Errors surface to the caller unchanged

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{BaseUri, BearerToken, ConnectionConfig, ConnectionConfigBuilder, ResourceName};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, QueryParams,
    RateLimitInfo,
};

// Re-export resource types
pub use rest::{
    Capabilities, Connection, DelayRange, DelegateRegistry, EndpointTemplates, Integration,
    Normalized, OneShot, Resource, ResourceClient, ResourceError, ResourceHandle,
    ResourceResponse, UnwrapPolicy,
};
