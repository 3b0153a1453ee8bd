//! HTTP client abstraction for testability

use crate::error::RenderError;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request with the given headers.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `headers` - Header name/value pairs sent with the request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Vec<u8>, RenderError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_timeout(30)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, RenderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RenderError::TileFetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Vec<u8>, RenderError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .map_err(|e| RenderError::TileFetch(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RenderError::TileFetch(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| RenderError::TileFetch(format!("failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock HTTP client for testing.
    ///
    /// Returns a canned response and records every requested URL.
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, String>,
        pub requested: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn returning(response: Result<Vec<u8>, String>) -> Self {
            Self {
                response,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str, _headers: &[(String, String)]) -> Result<Vec<u8>, RenderError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.response
                .clone()
                .map_err(RenderError::TileFetch)
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::returning(Ok(vec![1, 2, 3, 4]));
        let result = mock.get("http://example.com", &[]);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.requested.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::returning(Err("test error".to_string()));
        let result = mock.get("http://example.com", &[]);
        assert!(matches!(result, Err(RenderError::TileFetch(_))));
    }
}
