//! Resource clients and the pagination loop.
//!
//! A [`ResourceClient`] is bound to one resource name and exposes the seven
//! CRUD operations. The [`Resource`] trait is the seam for resource-specific
//! delegates: it forwards every operation to the underlying client by default
//! and adds [`Resource::each`], which walks every page of a collection.
//!
//! # Implementing a Delegate
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use rest_connection::clients::QueryParams;
//! use rest_connection::rest::{Resource, ResourceClient, ResourceError, ResourceResponse};
//!
//! struct ArchivedOrders(ResourceClient);
//!
//! #[async_trait]
//! impl Resource for ArchivedOrders {
//!     fn client(&self) -> &ResourceClient {
//!         &self.0
//!     }
//!
//!     async fn list(&self, params: Option<QueryParams>) -> Result<ResourceResponse, ResourceError> {
//!         let mut params = params.unwrap_or_default();
//!         params.insert("status".to_string(), "archived".to_string());
//!         self.0.list(Some(params)).await
//!     }
//! }
//! ```
//!
//! `each` on the delegate above pages through archived orders only, because
//! the loop goes through the delegate's own `list`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::{DataType, HttpError, HttpMethod, HttpRequest, HttpResponse, QueryParams};
use crate::config::ResourceName;
use crate::rest::errors::ResourceError;
use crate::rest::governor;
use crate::rest::integration::Integration;
use crate::rest::normalize::normalize;
use crate::rest::response::ResourceResponse;
use crate::rest::router::ConnectionInner;

/// A client bound to one resource of a connection.
///
/// Cloning is cheap: the connection state is shared.
#[derive(Clone, Debug)]
pub struct ResourceClient {
    inner: Arc<ConnectionInner>,
    resource: ResourceName,
}

// Verify ResourceClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceClient>();
};

impl ResourceClient {
    pub(crate) fn new(inner: Arc<ConnectionInner>, resource: ResourceName) -> Self {
        Self { inner, resource }
    }

    /// Returns the resource this client is bound to.
    #[must_use]
    pub const fn resource_name(&self) -> &ResourceName {
        &self.resource
    }

    /// Returns the integration behind the connection.
    #[must_use]
    pub fn integration(&self) -> &dyn Integration {
        self.inner.integration.as_ref()
    }

    /// Fetches one record.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on transport failure or an undecodable body.
    pub async fn get(&self, id: &str) -> Result<ResourceResponse, ResourceError> {
        let path = self.integration().endpoint_for_get(&self.resource, id);
        self.send(HttpMethod::Get, &path, None, None).await
    }

    /// Fetches one page of the collection.
    ///
    /// With `None` or empty params the first page is requested, so repeated
    /// calls without params always send the same query.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on transport failure or an undecodable body.
    pub async fn list(&self, params: Option<QueryParams>) -> Result<ResourceResponse, ResourceError> {
        self.list_with(params, None).await
    }

    /// Creates a record.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on transport failure or an undecodable body.
    pub async fn post(&self, data: Value) -> Result<ResourceResponse, ResourceError> {
        let path = self.integration().endpoint_for_post(&self.resource);
        self.send(HttpMethod::Post, &path, Some(data), None).await
    }

    /// Creates records in bulk.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on transport failure or an undecodable body.
    pub async fn post_many(&self, data: Value) -> Result<ResourceResponse, ResourceError> {
        let path = self.integration().endpoint_for_post_many(&self.resource);
        self.send(HttpMethod::Post, &path, Some(data), None).await
    }

    /// Updates a record.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on transport failure or an undecodable body.
    pub async fn put(&self, data: Value) -> Result<ResourceResponse, ResourceError> {
        let path = self.integration().endpoint_for_put(&self.resource);
        self.send(HttpMethod::Put, &path, Some(data), None).await
    }

    /// Updates records in bulk.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on transport failure or an undecodable body.
    pub async fn put_many(&self, data: Value) -> Result<ResourceResponse, ResourceError> {
        let path = self.integration().endpoint_for_put_many(&self.resource);
        self.send(HttpMethod::Put, &path, Some(data), None).await
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on transport failure or an undecodable body.
    pub async fn delete(&self, id: &str) -> Result<ResourceResponse, ResourceError> {
        let path = self.integration().endpoint_for_delete(&self.resource, id);
        self.send(HttpMethod::Delete, &path, None, None).await
    }

    /// Attaches extra query parameters to the next `list` call only.
    ///
    /// ```rust,ignore
    /// let mut extra = QueryParams::new();
    /// extra.insert("status".to_string(), "open".to_string());
    ///
    /// // Sends page=1&status=open
    /// orders.with_request_data(extra).list(None).await?;
    /// // Sends page=1
    /// orders.list(None).await?;
    /// ```
    #[must_use]
    pub fn with_request_data(&self, extra: QueryParams) -> OneShot<'_> {
        OneShot {
            client: self,
            extra,
        }
    }

    /// Sends a request to an arbitrary path and processes the response the
    /// same way the CRUD operations do.
    ///
    /// Delegates use this for endpoints outside the generic templates.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request is invalid or fails, and
    /// [`ResourceError::MalformedEnvelope`] if the body is not JSON.
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: Option<QueryParams>,
    ) -> Result<ResourceResponse, ResourceError> {
        let mut builder = HttpRequest::builder(method, path).tries(self.inner.tries);
        if let Some(body) = body {
            builder = builder.body(body).body_type(DataType::Json);
        }
        if let Some(query) = query {
            builder = builder.query(query);
        }
        let request = builder.build().map_err(HttpError::from)?;

        tracing::debug!(resource = %self.resource, %method, path, "resource request");
        let response = self.inner.http_client.request(request).await?;
        self.process_response(&response).await
    }

    /// Query parameters selecting `page` (and the page size, if any).
    #[must_use]
    pub fn page_params(&self, page: u64) -> QueryParams {
        let integration = self.integration();
        let mut params = QueryParams::new();
        params.insert(integration.page_name().to_string(), page.to_string());
        if let Some((name, size)) = integration.page_size() {
            params.insert(name.to_string(), size.to_string());
        }
        params
    }

    async fn list_with(
        &self,
        params: Option<QueryParams>,
        extra: Option<QueryParams>,
    ) -> Result<ResourceResponse, ResourceError> {
        let mut query = match params {
            Some(params) if !params.is_empty() => params,
            _ => self.page_params(1),
        };
        if let Some(extra) = extra {
            query.extend(extra);
        }

        let path = self.integration().endpoint_for_list(&self.resource);
        self.send(HttpMethod::Get, &path, None, Some(query)).await
    }

    async fn process_response(&self, response: &HttpResponse) -> Result<ResourceResponse, ResourceError> {
        let explicit = self.integration().rate_limit(response);
        governor::pause(governor::decide(explicit, &self.inner.delay_range)).await;

        let data = normalize(&response.body, self.inner.unwrap_policy)?;
        Ok(ResourceResponse::new(data, response))
    }
}

/// Extra request data for exactly one `list` call.
///
/// Created by [`ResourceClient::with_request_data`]. Calling
/// [`list`](Self::list) consumes it, so the data cannot leak into a later
/// request.
#[derive(Debug)]
#[must_use = "the request data only applies when `list` is called"]
pub struct OneShot<'a> {
    client: &'a ResourceClient,
    extra: QueryParams,
}

impl OneShot<'_> {
    /// Fetches one page with the extra data merged over `params`. The extra
    /// data wins on key collisions.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on transport failure or an undecodable body.
    pub async fn list(self, params: Option<QueryParams>) -> Result<ResourceResponse, ResourceError> {
        self.client.list_with(params, Some(self.extra)).await
    }
}

/// A client for one resource.
///
/// Every operation forwards to [`client`](Self::client) by default.
/// Delegates override only what differs for their resource.
#[async_trait]
pub trait Resource: Send + Sync {
    /// The generic client for this resource.
    fn client(&self) -> &ResourceClient;

    /// Fetches one record.
    async fn get(&self, id: &str) -> Result<ResourceResponse, ResourceError> {
        self.client().get(id).await
    }

    /// Fetches one page of the collection.
    async fn list(&self, params: Option<QueryParams>) -> Result<ResourceResponse, ResourceError> {
        self.client().list(params).await
    }

    /// Creates a record.
    async fn post(&self, data: Value) -> Result<ResourceResponse, ResourceError> {
        self.client().post(data).await
    }

    /// Creates records in bulk.
    async fn post_many(&self, data: Value) -> Result<ResourceResponse, ResourceError> {
        self.client().post_many(data).await
    }

    /// Updates a record.
    async fn put(&self, data: Value) -> Result<ResourceResponse, ResourceError> {
        self.client().put(data).await
    }

    /// Updates records in bulk.
    async fn put_many(&self, data: Value) -> Result<ResourceResponse, ResourceError> {
        self.client().put_many(data).await
    }

    /// Deletes a record.
    async fn delete(&self, id: &str) -> Result<ResourceResponse, ResourceError> {
        self.client().delete(id).await
    }

    /// Calls `callback` for every record of every page.
    ///
    /// Pages are requested from 1 upward through [`list`](Self::list). The
    /// loop stops after the page whose number reaches the total reported by
    /// [`Integration::total_pages`], or as soon as a page has no list under
    /// [`Integration::list_name`]. At least one page is always fetched.
    ///
    /// # Errors
    ///
    /// A failed page fetch or a callback error aborts the loop and is
    /// returned as-is.
    async fn each(
        &self,
        callback: &mut (dyn FnMut(Value) -> Result<(), ResourceError> + Send),
    ) -> Result<(), ResourceError> {
        let client = self.client();
        let integration = client.integration();

        let mut page: u64 = 1;
        let mut proceed = true;
        while proceed {
            let mut response = self.list(Some(client.page_params(page))).await?;

            let total = integration.total_pages(&response);
            if page >= total {
                proceed = false;
            }
            page += 1;

            let Some(Value::Array(items)) = response.take_field(integration.list_name()) else {
                tracing::debug!(
                    resource = %client.resource_name(),
                    list_name = integration.list_name(),
                    "page has no record list, stopping"
                );
                break;
            };

            for item in items {
                callback(item)?;
            }
        }

        Ok(())
    }

    /// Calls `callback` for every record of every page, like
    /// [`each`](Self::each), for callbacks that cannot fail.
    ///
    /// # Errors
    ///
    /// A failed page fetch aborts the loop and is returned as-is.
    async fn each_item(
        &self,
        callback: &mut (dyn FnMut(Value) + Send),
    ) -> Result<(), ResourceError> {
        self.each(&mut |item| {
            callback(item);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl Resource for ResourceClient {
    fn client(&self) -> &ResourceClient {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;
    use crate::rest::path::EndpointTemplates;
    use crate::rest::router::Connection;

    struct Paged;
    impl EndpointTemplates for Paged {}
    impl Integration for Paged {
        fn base_uri(&self) -> &str {
            "https://api.example.com/v1"
        }
        fn list_name(&self) -> &str {
            "items"
        }
        fn total_pages(&self, _response: &ResourceResponse) -> u64 {
            1
        }
        fn page_name(&self) -> &str {
            "p"
        }
        fn page_size(&self) -> Option<(&str, u32)> {
            Some(("per_page", 50))
        }
    }

    fn client() -> ResourceClient {
        let connection = Connection::new(Paged, ConnectionConfig::default()).unwrap();
        connection.select("orders").unwrap().client().clone()
    }

    #[test]
    fn test_page_params_use_integration_names() {
        let params = client().page_params(3);
        assert_eq!(params.get("p"), Some(&"3".to_string()));
        assert_eq!(params.get("per_page"), Some(&"50".to_string()));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_client_keeps_its_resource() {
        let client = client();
        assert_eq!(client.resource_name().as_ref(), "orders");
        assert_eq!(client.integration().list_name(), "items");
        assert_eq!(client.clone().resource_name(), client.resource_name());
    }

    #[test]
    fn test_resource_trait_is_object_safe() {
        let boxed: Box<dyn Resource> = Box::new(client());
        assert_eq!(boxed.client().resource_name().as_ref(), "orders");
    }
}
