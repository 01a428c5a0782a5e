//! Page fetching.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use url::Url;

use crate::config::EngineConfig;
use crate::error::{Result, ScourError};

/// Retrieves the HTML of a page.
pub trait Fetcher: Send + Sync {
    /// The page body, or `None` when the page cannot be used for any reason.
    fn fetch(&self, url: &Url) -> Option<String>;
}

/// Blocking HTTP fetcher.
///
/// Follows at most `redirect_limit` redirects and only accepts successful
/// responses whose content type is `text/html`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(redirect_limit: usize, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(redirect_limit))
            .timeout(timeout)
            .user_agent(concat!("scour/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScourError::fetch(format!("unable to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.redirect_limit, config.fetch_timeout())
    }
}

fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/html"))
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Option<String> {
        let response = match self.client.get(url.clone()).send() {
            Ok(response) => response,
            Err(err) => {
                log::debug!("fetch of {url} failed: {err}");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::debug!("fetch of {url} returned {status}");
            return None;
        }

        let html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_html);
        if !html {
            log::debug!("skipping {url}: not text/html");
            return None;
        }

        response.text().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/HTML; charset=UTF-8"));
        assert!(!is_html("application/json"));
        assert!(!is_html("text/htmlx"));
    }

    #[test]
    fn test_client_builds_from_config() {
        assert!(HttpFetcher::from_config(&EngineConfig::default()).is_ok());
    }
}
