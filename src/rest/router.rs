//! Connections and resource routing.
//!
//! A [`Connection`] is created once per API session. Resources are chosen by
//! name at call time with [`Connection::select`], which checks the name
//! against the integration's whitelist and hands back either the generic
//! [`ResourceClient`] or a registered delegate.
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_connection::{Connection, ConnectionConfig};
//! use rest_connection::rest::Resource;
//!
//! let connection = Connection::new(Shop, ConnectionConfig::default())?;
//!
//! let page = connection.select("orders")?.list(None).await?;
//!
//! let mut count = 0;
//! connection
//!     .select("customers")?
//!     .each_item(&mut |_customer| count += 1)
//!     .await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::auth::BearerAuth;
use crate::clients::HttpClient;
use crate::config::{BaseUri, ConnectionConfig, ResourceName};
use crate::error::ConfigError;
use crate::rest::errors::ResourceError;
use crate::rest::governor::DelayRange;
use crate::rest::integration::Integration;
use crate::rest::normalize::UnwrapPolicy;
use crate::rest::resource::{Resource, ResourceClient};

/// Builds a delegate for one resource from its generic client.
pub type DelegateFactory = Arc<dyn Fn(ResourceClient) -> Box<dyn Resource> + Send + Sync>;

/// Resource names mapped to delegate constructors.
///
/// ```rust,ignore
/// fn delegates(&self) -> DelegateRegistry {
///     DelegateRegistry::new().register("orders", ArchivedOrders)
/// }
/// ```
#[derive(Clone, Default)]
pub struct DelegateRegistry {
    factories: HashMap<String, DelegateFactory>,
}

impl DelegateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a delegate constructor for `name`, replacing any earlier one.
    #[must_use]
    pub fn register<F, R>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(ResourceClient) -> R + Send + Sync + 'static,
        R: Resource + 'static,
    {
        self.factories.insert(
            name.into(),
            Arc::new(move |client| Box::new(factory(client)) as Box<dyn Resource>),
        );
        self
    }

    /// Returns the constructor registered for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DelegateFactory> {
        self.factories.get(name)
    }

    /// Returns `true` if `name` has a delegate.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the number of registered delegates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no delegate is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for DelegateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("DelegateRegistry")
            .field("resources", &names)
            .finish()
    }
}

/// State shared by a connection and every client it hands out.
pub(crate) struct ConnectionInner {
    pub(crate) integration: Arc<dyn Integration>,
    pub(crate) http_client: HttpClient,
    pub(crate) delegates: DelegateRegistry,
    pub(crate) delay_range: DelayRange,
    pub(crate) unwrap_policy: UnwrapPolicy,
    pub(crate) tries: u32,
}

impl fmt::Debug for ConnectionInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInner")
            .field("base_uri", &self.http_client.base_uri())
            .field("list_name", &self.integration.list_name())
            .field("delegates", &self.delegates)
            .field("delay_range", &self.delay_range)
            .field("unwrap_policy", &self.unwrap_policy)
            .field("tries", &self.tries)
            .finish_non_exhaustive()
    }
}

/// The client a resource name resolves to.
///
/// Derefs to [`Resource`], so operations can be chained directly onto
/// [`Connection::select`].
pub enum ResourceHandle {
    /// The generic client.
    Generic(ResourceClient),
    /// A resource-specific client registered by the integration.
    Delegate(Box<dyn Resource>),
}

impl ResourceHandle {
    /// Returns `true` if the name resolved to a delegate.
    #[must_use]
    pub const fn is_delegate(&self) -> bool {
        matches!(self, Self::Delegate(_))
    }

    /// Returns the generic client underneath.
    #[must_use]
    pub fn client(&self) -> &ResourceClient {
        match self {
            Self::Generic(client) => client,
            Self::Delegate(delegate) => delegate.client(),
        }
    }
}

impl Deref for ResourceHandle {
    type Target = dyn Resource;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Generic(client) => client,
            Self::Delegate(delegate) => &**delegate,
        }
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_delegate() { "Delegate" } else { "Generic" };
        f.debug_tuple(kind)
            .field(self.client().resource_name())
            .finish()
    }
}

/// A session against one REST API.
///
/// The connection remembers the last resource selected through it. That
/// value is shared by every caller of the connection, so concurrent callers
/// should hold on to the handle returned by [`select`](Self::select) instead
/// of relying on [`active`](Self::active).
#[derive(Debug)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
    active: Mutex<Option<ResourceName>>,
}

// Verify Connection is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Connection>();
};

impl Connection {
    /// Creates a connection for `integration`.
    ///
    /// The configured base URI, if any, overrides the integration's.
    /// Configured headers are merged over the integration's headers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUri`] if the integration's base URI
    /// is not absolute, and [`ConfigError::MissingRequiredField`] if the
    /// integration uses bearer auth but no token is configured.
    /// Returns [`ConfigError::EmptyResourceName`] if the integration's
    /// whitelist contains an empty name.
    pub fn new<I: Integration + 'static>(
        integration: I,
        config: ConnectionConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_shared(Arc::new(integration), config)
    }

    /// Creates a connection for an integration that is already shared.
    ///
    /// # Errors
    ///
    /// See [`Connection::new`].
    pub fn with_shared(
        integration: Arc<dyn Integration>,
        config: ConnectionConfig,
    ) -> Result<Self, ConfigError> {
        if let Some(names) = integration.resource_names() {
            for name in names {
                ResourceName::new(*name)?;
            }
        }

        let base_uri = match config.base_uri() {
            Some(uri) => uri.clone(),
            None => BaseUri::new(integration.base_uri())?,
        };

        let mut headers = integration.headers();
        headers.extend(config.headers().clone());

        let mut http_client = HttpClient::new(base_uri.as_ref(), headers, config.user_agent_prefix());
        if integration.capabilities().uses_bearer_auth {
            let token = config
                .bearer_token()
                .cloned()
                .ok_or(ConfigError::MissingRequiredField {
                    field: "bearer_token",
                })?;
            http_client = http_client.with_hook(Arc::new(BearerAuth::new(token)));
        }

        let delegates = integration.delegates();
        tracing::debug!(
            base_uri = %base_uri,
            delegates = delegates.len(),
            "connection created"
        );

        Ok(Self {
            inner: Arc::new(ConnectionInner {
                integration,
                http_client,
                delegates,
                delay_range: config.delay_range(),
                unwrap_policy: config.unwrap_policy(),
                tries: config.tries(),
            }),
            active: Mutex::new(None),
        })
    }

    /// Resolves `name` to a resource client and makes it the active resource.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResource`] if the integration declares
    /// a whitelist that does not contain `name`, and [`ResourceError::Config`]
    /// if `name` is empty.
    pub fn select(&self, name: &str) -> Result<ResourceHandle, ResourceError> {
        let resource = self.validate(name)?;
        tracing::debug!(resource = %resource, "setting resource");
        *self.lock_active() = Some(resource.clone());
        Ok(self.resolve(resource))
    }

    /// Re-resolves the most recently selected resource.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NoResourceSelected`] if nothing has been
    /// selected yet.
    pub fn active(&self) -> Result<ResourceHandle, ResourceError> {
        let resource = self
            .active_resource()
            .ok_or(ResourceError::NoResourceSelected)?;
        Ok(self.resolve(resource))
    }

    /// Returns the most recently selected resource name.
    #[must_use]
    pub fn active_resource(&self) -> Option<ResourceName> {
        self.lock_active().clone()
    }

    /// Returns the integration's whitelist, if it declares one.
    #[must_use]
    pub fn valid_resources(&self) -> Option<&[&str]> {
        self.inner.integration.resource_names()
    }

    /// Returns the integration behind this connection.
    #[must_use]
    pub fn integration(&self) -> &dyn Integration {
        self.inner.integration.as_ref()
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub fn http_client(&self) -> &HttpClient {
        &self.inner.http_client
    }

    /// Returns the fallback delay range.
    #[must_use]
    pub fn delay_range(&self) -> DelayRange {
        self.inner.delay_range
    }

    fn validate(&self, name: &str) -> Result<ResourceName, ResourceError> {
        if let Some(valid) = self.inner.integration.resource_names() {
            if !valid.contains(&name) {
                return Err(ResourceError::UnknownResource {
                    name: name.to_string(),
                    valid: valid.iter().map(ToString::to_string).collect(),
                });
            }
        }
        Ok(ResourceName::new(name)?)
    }

    fn resolve(&self, resource: ResourceName) -> ResourceHandle {
        let client = ResourceClient::new(Arc::clone(&self.inner), resource);
        match self.inner.delegates.get(client.resource_name().as_ref()) {
            Some(factory) => ResourceHandle::Delegate(factory(client)),
            None => ResourceHandle::Generic(client),
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ResourceName>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BearerToken;
    use crate::rest::path::EndpointTemplates;
    use crate::rest::response::ResourceResponse;
    use crate::rest::Capabilities;

    struct Whitelisted;
    impl EndpointTemplates for Whitelisted {}
    impl Integration for Whitelisted {
        fn base_uri(&self) -> &str {
            "https://api.example.com/v1"
        }
        fn list_name(&self) -> &str {
            "data"
        }
        fn total_pages(&self, _response: &ResourceResponse) -> u64 {
            1
        }
        fn resource_names(&self) -> Option<&[&str]> {
            Some(&["orders", "customers"])
        }
        fn delegates(&self) -> DelegateRegistry {
            DelegateRegistry::new().register("customers", Customers)
        }
    }

    struct Open;
    impl EndpointTemplates for Open {}
    impl Integration for Open {
        fn base_uri(&self) -> &str {
            "https://api.example.com"
        }
        fn list_name(&self) -> &str {
            "data"
        }
        fn total_pages(&self, _response: &ResourceResponse) -> u64 {
            1
        }
        fn capabilities(&self) -> Capabilities {
            Capabilities {
                uses_bearer_auth: true,
            }
        }
    }

    struct Customers(ResourceClient);

    #[async_trait::async_trait]
    impl Resource for Customers {
        fn client(&self) -> &ResourceClient {
            &self.0
        }
    }

    fn whitelisted() -> Connection {
        Connection::new(Whitelisted, ConnectionConfig::default()).unwrap()
    }

    #[test]
    fn test_select_rejects_names_outside_whitelist() {
        let error = whitelisted().select("foo").unwrap_err();
        assert_eq!(
            error.to_string(),
            "foo resource not found, did you mean one of these? orders, customers"
        );
    }

    #[test]
    fn test_select_returns_generic_client_and_sets_active() {
        let connection = whitelisted();
        assert!(connection.active_resource().is_none());

        let handle = connection.select("orders").unwrap();
        assert!(!handle.is_delegate());
        assert_eq!(handle.client().resource_name().as_ref(), "orders");
        assert_eq!(connection.active_resource().unwrap().as_ref(), "orders");
    }

    #[test]
    fn test_select_returns_registered_delegate() {
        let handle = whitelisted().select("customers").unwrap();
        assert!(handle.is_delegate());
        assert_eq!(handle.client().resource_name().as_ref(), "customers");
        assert_eq!(format!("{handle:?}"), r#"Delegate(ResourceName("customers"))"#);
    }

    #[test]
    fn test_last_selection_wins() {
        let connection = whitelisted();
        let orders = connection.select("orders").unwrap();
        connection.select("customers").unwrap();

        assert_eq!(connection.active_resource().unwrap().as_ref(), "customers");
        assert!(connection.active().unwrap().is_delegate());
        assert_eq!(orders.client().resource_name().as_ref(), "orders");
    }

    #[test]
    fn test_active_without_selection_is_an_error() {
        let error = whitelisted().active().unwrap_err();
        assert!(matches!(error, ResourceError::NoResourceSelected));
    }

    #[test]
    fn test_open_integration_accepts_any_non_empty_name() {
        let config = ConnectionConfig::builder()
            .bearer_token(BearerToken::new("t").unwrap())
            .build()
            .unwrap();
        let connection = Connection::new(Open, config).unwrap();

        assert!(connection.valid_resources().is_none());
        assert!(connection.select("anything").is_ok());
        assert!(matches!(
            connection.select(""),
            Err(ResourceError::Config(ConfigError::EmptyResourceName))
        ));
    }

    #[test]
    fn test_whitelist_with_empty_name_is_rejected_at_construction() {
        struct Blank;
        impl EndpointTemplates for Blank {}
        impl Integration for Blank {
            fn base_uri(&self) -> &str {
                "https://api.example.com"
            }
            fn list_name(&self) -> &str {
                "data"
            }
            fn total_pages(&self, _response: &ResourceResponse) -> u64 {
                1
            }
            fn resource_names(&self) -> Option<&[&str]> {
                Some(&["orders", ""])
            }
        }

        let error = Connection::new(Blank, ConnectionConfig::default()).unwrap_err();
        assert_eq!(error, ConfigError::EmptyResourceName);
    }

    #[test]
    fn test_bearer_auth_requires_a_token() {
        let error = Connection::new(Open, ConnectionConfig::default()).unwrap_err();
        assert_eq!(
            error,
            ConfigError::MissingRequiredField {
                field: "bearer_token"
            }
        );
    }

    #[test]
    fn test_bearer_auth_installs_hook() {
        let config = ConnectionConfig::builder()
            .bearer_token(BearerToken::new("t").unwrap())
            .build()
            .unwrap();
        let connection = Connection::new(Open, config).unwrap();
        assert_eq!(connection.http_client().hook_count(), 1);

        assert_eq!(whitelisted().http_client().hook_count(), 0);
    }

    #[test]
    fn test_config_base_uri_overrides_integration() {
        let config = ConnectionConfig::builder()
            .base_uri(BaseUri::new("http://localhost:9000/api/").unwrap())
            .header("X-Tenant", "acme")
            .build()
            .unwrap();
        let connection = Connection::new(Whitelisted, config).unwrap();

        assert_eq!(connection.http_client().base_uri(), "http://localhost:9000/api");
        assert_eq!(
            connection.http_client().default_headers().get("X-Tenant"),
            Some(&"acme".to_string())
        );
    }

    #[test]
    fn test_delegate_registry_debug_lists_names() {
        let registry = DelegateRegistry::new()
            .register("b", Customers)
            .register("a", Customers);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert_eq!(format!("{registry:?}"), r#"DelegateRegistry { resources: ["a", "b"] }"#);
    }
}
