// Catalogue HTTP client.
// Wraps reqwest with fixed headers and converts response status into errors.

use std::time::Duration;

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{EcoError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP client for fetching catalogue documents.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    pub fn new() -> Result<Self> {
        Self::build(Client::builder())
    }

    /// Client that ignores proxy environment variables.
    #[cfg(test)]
    pub fn direct() -> Result<Self> {
        Self::build(Client::builder().no_proxy())
    }

    fn build(builder: reqwest::ClientBuilder) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ecoview/", env!("CARGO_PKG_VERSION"))),
        );

        let client = builder
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(EcoError::Network)?;

        Ok(Self { client })
    }

    /// GET `url` and return the body text of a successful response.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!(url, "fetching catalogue");
        let response = self.client.get(url).send().await?;
        let response = check_response(url, response)?;
        Ok(response.text().await?)
    }
}

/// Check response status and convert errors.
fn check_response(url: &str, response: Response) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        status => Err(EcoError::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        }),
    }
}
