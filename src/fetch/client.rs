use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam between the poll loop and the HTTP transport; request decorators and
/// test doubles wrap the real client behind it.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
