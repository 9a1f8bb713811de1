//! Endpoint templates for resource operations.
//!
//! Every operation maps a resource name (and, for `get`/`delete`, a record
//! id) to a path relative to the API base URI. The defaults are deliberately
//! uniform:
//!
//! | Operation | Default path |
//! |---|---|
//! | `get`, `delete` | `{resource}/{id}` |
//! | `list`, `post`, `post_many`, `put`, `put_many` | `{resource}` |
//!
//! Integrations override only the templates that differ for their API.
//!
//! # Example
//!
//! ```rust
//! use rest_connection::rest::EndpointTemplates;
//! use rest_connection::ResourceName;
//!
//! struct Billing;
//!
//! impl EndpointTemplates for Billing {
//!     fn endpoint_for_post_many(&self, resource: &ResourceName) -> String {
//!         format!("{resource}/batch")
//!     }
//! }
//!
//! let invoices = ResourceName::new("invoices").unwrap();
//! assert_eq!(Billing.endpoint_for_get(&invoices, "42"), "invoices/42");
//! assert_eq!(Billing.endpoint_for_post_many(&invoices), "invoices/batch");
//! ```

use crate::clients::HttpMethod;
use crate::config::ResourceName;

/// Operations exposed by a resource client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// Fetch a single record by id.
    Get,
    /// Fetch one page of the collection.
    List,
    /// Create a record.
    Post,
    /// Create records in bulk.
    PostMany,
    /// Update a record.
    Put,
    /// Update records in bulk.
    PutMany,
    /// Delete a record by id.
    Delete,
}

impl ResourceOperation {
    /// All operations, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::List,
        Self::Post,
        Self::PostMany,
        Self::Put,
        Self::PutMany,
        Self::Delete,
    ];

    /// Returns the HTTP method for this operation.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        match self {
            Self::Get | Self::List => HttpMethod::Get,
            Self::Post | Self::PostMany => HttpMethod::Post,
            Self::Put | Self::PutMany => HttpMethod::Put,
            Self::Delete => HttpMethod::Delete,
        }
    }

    /// Returns `true` for operations addressed to a single record id.
    #[must_use]
    pub const fn requires_id(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }

    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::List => "list",
            Self::Post => "post",
            Self::PostMany => "post_many",
            Self::Put => "put",
            Self::PutMany => "put_many",
            Self::Delete => "delete",
        }
    }
}

/// Returns `{resource}`.
#[must_use]
pub fn collection_path(resource: &ResourceName) -> String {
    resource.as_ref().to_string()
}

/// Returns `{resource}/{id}`.
#[must_use]
pub fn member_path(resource: &ResourceName, id: &str) -> String {
    format!("{}/{id}", resource.as_ref())
}

/// Per-operation path templates.
///
/// All seven methods have defaults, so `impl EndpointTemplates for MyApi {}`
/// is a complete implementation.
pub trait EndpointTemplates {
    /// Path for `get(id)`.
    fn endpoint_for_get(&self, resource: &ResourceName, id: &str) -> String {
        member_path(resource, id)
    }

    /// Path for `list(params)`.
    fn endpoint_for_list(&self, resource: &ResourceName) -> String {
        collection_path(resource)
    }

    /// Path for `post(data)`.
    fn endpoint_for_post(&self, resource: &ResourceName) -> String {
        collection_path(resource)
    }

    /// Path for `post_many(data)`.
    fn endpoint_for_post_many(&self, resource: &ResourceName) -> String {
        collection_path(resource)
    }

    /// Path for `put(data)`.
    fn endpoint_for_put(&self, resource: &ResourceName) -> String {
        collection_path(resource)
    }

    /// Path for `put_many(data)`.
    fn endpoint_for_put_many(&self, resource: &ResourceName) -> String {
        collection_path(resource)
    }

    /// Path for `delete(id)`.
    fn endpoint_for_delete(&self, resource: &ResourceName, id: &str) -> String {
        member_path(resource, id)
    }
}
