//! Resource routing, pagination and envelope normalization.
//!
//! This module provides the core of the crate:
//!
//! - **[`Integration`] trait**: what a concrete API declares (base URI, list
//!   field, page count) plus optional overrides
//! - **[`EndpointTemplates`]**: per-operation path templates with uniform defaults
//! - **[`Connection`]**: a session that routes resource names to clients
//! - **[`ResourceClient`]** and the **[`Resource`]** trait: CRUD operations and
//!   the [`each`](Resource::each) pagination loop
//! - **[`ResourceResponse`]**: a Deref-based wrapper over a [`Normalized`] body
//! - **[`governor`]**: the pause taken after every response
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_connection::{Connection, ConnectionConfig};
//! use rest_connection::rest::{EndpointTemplates, Integration, Resource, ResourceResponse};
//!
//! struct Crm;
//!
//! impl EndpointTemplates for Crm {}
//!
//! impl Integration for Crm {
//!     fn base_uri(&self) -> &str {
//!         "https://crm.example.com/api"
//!     }
//!     fn list_name(&self) -> &str {
//!         "contacts"
//!     }
//!     fn total_pages(&self, response: &ResourceResponse) -> u64 {
//!         response.field("pages").and_then(|v| v.as_u64()).unwrap_or(1)
//!     }
//! }
//!
//! let connection = Connection::new(Crm, ConnectionConfig::default())?;
//!
//! // Single page
//! let first = connection.select("contacts")?.list(None).await?;
//!
//! // Every record of every page
//! connection
//!     .select("contacts")?
//!     .each(&mut |contact| {
//!         println!("{contact}");
//!         Ok(())
//!     })
//!     .await?;
//! ```

mod errors;
pub mod governor;
mod integration;
pub mod normalize;
mod path;
mod resource;
mod response;
mod router;

pub use errors::ResourceError;
pub use governor::{DelayRange, Throttle};
pub use integration::{Capabilities, Integration};
pub use normalize::{Normalized, UnwrapPolicy};
pub use path::{collection_path, member_path, EndpointTemplates, ResourceOperation};
pub use resource::{OneShot, Resource, ResourceClient};
pub use response::ResourceResponse;
pub use router::{Connection, DelegateFactory, DelegateRegistry, ResourceHandle};
