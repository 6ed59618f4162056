use url::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Custom error type for HTTP requests.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("request to {0} failed: {1}")]
    Network(Url, String),
    #[error("HTTP error: {0} returned status {1}. Response body: {2}")]
    HttpError(Url, u16, String),
    #[error("Error deserializing JSON: {0}")]
    JsonError(String),
    #[error("Other error: {0}")]
    Other(String),
}

impl RequestError {
    fn from_send(url: &Url, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(url.clone(), format!("timed out: {}", err))
        } else {
            Self::Network(url.clone(), err.to_string())
        }
    }
}

// Requester issues GET requests against a single JSON API.
pub struct Requester {
    client: reqwest::Client,
}

impl Requester {
    pub fn new(timeout: Duration) -> Result<Requester, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coin_chart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RequestError::Other(e.to_string()))?;
        Ok(Requester { client })
    }

    /// Makes a GET request to the specified url with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,              // Absolute url.
        params: &[(&str, &str)], // Optional query parameters.
    ) -> Result<T, RequestError> {
        // Construct the URL.
        let url = if !params.is_empty() {
            Url::parse_with_params(path, params).map_err(|e| RequestError::Other(e.to_string()))?
        } else {
            Url::parse(path).map_err(|e| RequestError::Other(e.to_string()))?
        };

        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RequestError::from_send(&url, e))?;

        // Get the response status code.
        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|e| RequestError::from_send(&url, e))?;

        // Handle non-success status codes.
        if !status.is_success() {
            return Err(RequestError::HttpError(url, status.as_u16(), body));
        }

        log::debug!("{} returned {} bytes", url, body.len());

        // Deserialize the JSON response.
        serde_json::from_str(&body).map_err(|e| RequestError::JsonError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connection_failure_names_the_url() {
        let requester = Requester::new(Duration::from_secs(2)).unwrap();
        let err = requester
            .get::<serde_json::Value>("http://127.0.0.1:1/api/v3/ping", &[])
            .await
            .unwrap_err();

        match &err {
            RequestError::Network(url, _) => assert_eq!(url.port(), Some(1)),
            other => panic!("expected network error, got {:?}", other),
        }
        assert!(err.to_string().contains("127.0.0.1:1"));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_sending() {
        let requester = Requester::new(Duration::from_secs(2)).unwrap();
        let err = requester
            .get::<serde_json::Value>("not a url", &[("a", "b")])
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Other(_)));
    }
}
