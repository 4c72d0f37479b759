use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that appends the forecast location as `lat` and
/// `lon` query parameters, the coordinate encoding the feed endpoint expects.
pub struct Coordinates<C> {
    pub inner: C,
    pub lat: f64,
    pub lon: f64,
}

#[async_trait]
impl<C: HttpClient> HttpClient for Coordinates<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair("lat", &self.lat.to_string())
            .append_pair("lon", &self.lon.to_string());
        self.inner.execute(req).await
    }
}
