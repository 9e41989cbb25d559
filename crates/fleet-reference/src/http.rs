//! HTTP reference source.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use uuid::Uuid;

use fleet_core::defaults::{ASSETS_PATH, CONSUMABLES_PATH, SERVICES_PATH};
use fleet_core::{Asset, Consumable, Error, ReferenceSource, Result, Service};

/// Default base URL of the reference service.
pub const DEFAULT_BASE_URL: &str = fleet_core::defaults::REFERENCE_BASE_URL;

/// Reference source backed by the sibling HTTP service.
///
/// No request timeout is configured beyond the transport defaults. Failures
/// are returned to the caller, which decides whether to degrade.
#[derive(Clone)]
pub struct HttpReferenceSource {
    client: Client,
    base_url: String,
}

impl HttpReferenceSource {
    /// Create a source for `base_url` with a default client.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a source reusing an existing client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(
            subsystem = "reference",
            component = "http",
            base_url = %base_url,
            "Initializing HTTP reference source"
        );
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let start = Instant::now();
        let url = self.url(path);

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?;
        let items: Vec<T> = response.json().await?;

        debug!(
            subsystem = "reference",
            component = "http",
            op = "get_list",
            path,
            result_count = items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Fetched reference list"
        );
        Ok(items)
    }
}

#[async_trait]
impl ReferenceSource for HttpReferenceSource {
    async fn fetch_services(&self) -> Result<Vec<Service>> {
        self.get_list(SERVICES_PATH).await
    }

    async fn fetch_consumables(&self) -> Result<Vec<Consumable>> {
        self.get_list(CONSUMABLES_PATH).await
    }

    async fn fetch_asset(&self, id: Uuid) -> Result<Option<Asset>> {
        let start = Instant::now();
        let url = self.url(&format!("{}/{}", ASSETS_PATH, id));

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(
                subsystem = "reference",
                component = "http",
                op = "fetch_asset",
                asset_id = %id,
                "Asset not known to reference service"
            );
            return Ok(None);
        }
        let asset: Asset = response.error_for_status()?.json().await?;

        debug!(
            subsystem = "reference",
            component = "http",
            op = "fetch_asset",
            asset_id = %id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Fetched asset"
        );
        Ok(Some(asset))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let source = HttpReferenceSource::new("http://refs.local:5500/").unwrap();
        assert_eq!(source.base_url(), "http://refs.local:5500");
        assert_eq!(source.url(SERVICES_PATH), "http://refs.local:5500/services");
    }

    #[test]
    fn test_asset_url_uses_canonical_id() {
        let source = HttpReferenceSource::new(DEFAULT_BASE_URL).unwrap();
        let id = Uuid::nil();
        assert_eq!(
            source.url(&format!("{}/{}", ASSETS_PATH, id)),
            "http://localhost:5500/assets/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_source_name() {
        let source = HttpReferenceSource::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(source.source_name(), "http");
    }
}
