//! HTTP fetcher
//!
//! Wraps a reqwest client configured for crawling: user agent, timeouts and
//! transport-level redirect following. The final URL after redirects is
//! reported back so the link store can record redirect markers.

use crate::config::FetcherConfig;
use crate::{QuarryError, Result};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Result of fetching one URL
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after transport-level redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, as received
    pub content_type: String,
    /// Last-Modified header value, as received
    pub last_modified: String,
    /// Raw response body
    pub body: Vec<u8>,
}

/// HTTP fetcher used for link resolution and page content
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher from configuration.
    pub fn new(config: &FetcherConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a URL, following transport-level redirects.
    ///
    /// Request failures and body-read failures are distinguished so the
    /// orchestrator can abort on the former and skip on the latter.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| QuarryError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let content_type = header_value(&response, "content-type");
        let last_modified = header_value(&response, "last-modified");

        let body = response
            .bytes()
            .await
            .map_err(|source| QuarryError::Body {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            last_modified,
            body,
        })
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FetcherConfig {
        FetcherConfig {
            user_agent: "quarry-test/0.3".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn build_fetcher() {
        assert!(Fetcher::new(&test_config()).is_ok());
    }

    #[tokio::test]
    async fn fetch_reports_headers_and_body() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html></html>", "text/html")
                    .insert_header("last-modified", "Tue, 01 Jan 2030 00:00:00 GMT"),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&test_config()).unwrap();
        let page = fetcher.fetch(&format!("{}/page", server.uri())).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.content_type, "text/html");
        assert_eq!(page.last_modified, "Tue, 01 Jan 2030 00:00:00 GMT");
        assert_eq!(page.body, b"<html></html>".to_vec());
    }

    #[tokio::test]
    async fn fetch_follows_redirects_to_final_url() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/html"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&test_config()).unwrap();
        let page = fetcher.fetch(&format!("{}/old", server.uri())).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.final_url.path(), "/new");
    }

    #[tokio::test]
    async fn fetch_error_on_unreachable_host() {
        let fetcher = Fetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:1/").await;
        assert!(matches!(result, Err(QuarryError::Fetch { .. })));
    }
}
