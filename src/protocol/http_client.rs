use crate::protocol::message_types::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// HTTP transport the runner dispatches validated requests through.
///
/// Errors are opaque to the runner and surface to the caller unchanged; timeouts,
/// cancellation and retries are the implementation's concern.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, anyhow::Error>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, anyhow::Error> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Box<C> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, anyhow::Error> {
        (**self).send(request).await
    }
}
