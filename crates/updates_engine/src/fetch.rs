use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use updates_logging::updates_debug;
use url::Url;

use crate::decode::decode_page;
use crate::{FailureKind, FetchError, FetchedPage};

/// Path of the update feed, relative to the backend base URL.
pub const UPDATE_PATH: &str = "api/update";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for a whole page request, body included.
    pub request_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// A paged source of update records.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<FetchedPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFeedSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl ReqwestFeedSource {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let endpoint = feed_endpoint(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn page_url(&self, page: u32, limit: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        url
    }
}

#[async_trait::async_trait]
impl FeedSource for ReqwestFeedSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<FetchedPage, FetchError> {
        let url = self.page_url(page, limit);
        updates_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(FetchedPage::NoContent);
        }
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let decoded = decode_page(&body)?;
        Ok(FetchedPage::Records {
            records: decoded.records,
            skipped: decoded.skipped,
        })
    }
}

/// Joins the feed path onto `base_url`, keeping any path prefix the base carries.
fn feed_endpoint(base_url: &str) -> Result<Url, FetchError> {
    let base = format!("{}/", base_url.trim().trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|base| base.join(UPDATE_PATH))
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{base_url}: {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
