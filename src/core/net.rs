// src/core/net.rs
// Blocking HTTP(S) GET. One request at a time; every call is bounded by a timeout.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::config::consts::{TIMEOUT_SECS, USER_AGENT};
use crate::error::FetchError;

/// A fetched HTML page.
#[derive(Clone, Debug)]
pub struct Page {
    /// Final URL after redirects; relative links resolve against this.
    pub url: Url,
    pub body: String,
}

/// Anything that can GET a page. The run only talks to the network through this.
pub trait Fetch {
    fn get(&self, url: &Url) -> Result<Page, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, url: &Url) -> Result<Page, FetchError> {
        (**self).get(url)
    }
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpClient {
    fn get(&self, url: &Url) -> Result<Page, FetchError> {
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = resp.url().clone();
        let body = resp
            .text()
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;
        debug!(url = %final_url, bytes = body.len(), "fetched");

        Ok(Page { url: final_url, body })
    }
}
