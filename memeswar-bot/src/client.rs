use std::time::Duration;

use memeswar_core::{EndpointName, EndpointRegistry, HttpMethod, PathParams};
use serde_json::Value;

use crate::errors::CallError;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport};

/// Resolves logical endpoints through the registry and sends them over one
/// account's transport.
pub struct ApiClient<'a, T> {
    transport: T,
    registry: &'a EndpointRegistry,
    timeout: Duration,
}

impl<'a, T: ApiTransport> ApiClient<'a, T> {
    pub const fn new(transport: T, registry: &'a EndpointRegistry, timeout: Duration) -> Self {
        Self {
            transport,
            registry,
            timeout,
        }
    }

    pub const fn registry(&self) -> &'a EndpointRegistry {
        self.registry
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Call `name` with the method from its descriptor.
    pub async fn call(
        &self,
        name: EndpointName,
        params: &PathParams,
        body: Option<Value>,
    ) -> Result<ApiResponse, CallError> {
        let method = self.registry.get(name)?.method;
        self.call_with(name, method, params, body).await
    }

    pub async fn call_with(
        &self,
        name: EndpointName,
        method: HttpMethod,
        params: &PathParams,
        body: Option<Value>,
    ) -> Result<ApiResponse, CallError> {
        let url = self.registry.url(name, params)?;
        log::debug!("[{name}] {method} {url}");
        let response = self
            .transport
            .send(ApiRequest {
                method,
                url,
                body,
                timeout: self.timeout,
            })
            .await?;
        Ok(response)
    }
}
