//! Native HTTP fetching using reqwest

use std::time::Duration;

use reqwest::Client;

use super::SourceFetcher;
use crate::error::FetchError;

/// Fetches bibliography files over HTTP(S)
///
/// Relative locations are joined onto `base_url` when one is set.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Option<String>,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Request {
                location: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn resolve(&self, location: &str) -> String {
        let absolute = location.starts_with("http://") || location.starts_with("https://");
        match &self.base_url {
            Some(base) if !absolute => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                location.trim_start_matches('/')
            ),
            _ => location.to_string(),
        }
    }
}

impl SourceFetcher for HttpFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        let url = self.resolve(location);
        tracing::debug!(%url, "Fetching bibliography");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                location: location.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Request {
            location: location.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_location() {
        let fetcher = HttpFetcher::new("impress-citecards/0.1")
            .unwrap()
            .with_base_url("https://example.org/site/");

        assert_eq!(
            fetcher.resolve("/publications/journals.bib"),
            "https://example.org/site/publications/journals.bib"
        );
        assert_eq!(
            fetcher.resolve("https://other.org/x.bib"),
            "https://other.org/x.bib"
        );
    }

    #[test]
    fn test_resolve_without_base() {
        let fetcher = HttpFetcher::new("impress-citecards/0.1").unwrap();
        assert_eq!(fetcher.resolve("https://a.org/b.bib"), "https://a.org/b.bib");
    }
}
