//! HTTP client for the Beverage API.
//!
//! [`BeverageClient`] performs CRUD calls against `{base_url}/beverages[/{id}]`
//! and maps every response onto either a typed value or a [`ClientError`].
//! It keeps no state besides the base URL and a shared connection pool, so it
//! can be cloned freely and used from concurrent tasks. It never retries.
//!
//! # Example
//!
//! ```no_run
//! use beverage_provider::client::BeverageClient;
//!
//! # async fn example() -> Result<(), beverage_provider::ClientError> {
//! let client = BeverageClient::new("http://api.local")?;
//! let latte = client.create("Latte", "coffee").await?;
//! let fetched = client.get(latte.id).await?;
//! assert_eq!(fetched.name, "Latte");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::error::{ClientError, Operation};
use crate::types::{Beverage, BeverageRequest};

/// Client for the Beverage REST API.
#[derive(Debug, Clone)]
pub struct BeverageClient {
    base_url: String,
    http: reqwest::Client,
}

impl BeverageClient {
    /// Create a client with a default HTTP transport.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client whose transport gives up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::HttpClient)?;
        Self::with_http_client(base_url, http)
    }

    /// Create a client on top of an existing `reqwest::Client`.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            http,
        })
    }

    /// The base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a beverage. The API assigns its `id`.
    pub async fn create(&self, name: &str, beverage_type: &str) -> Result<Beverage, ClientError> {
        let body = BeverageRequest::new(name, beverage_type);
        let request = self.http.post(self.collection_url()).json(&body);
        let response = self.execute(Operation::Create, request).await?;
        let created: Beverage = decode(Operation::Create, response).await?;
        debug!(id = created.id, "Beverage created");
        Ok(created)
    }

    /// Fetch a single beverage by id.
    pub async fn get(&self, id: i64) -> Result<Beverage, ClientError> {
        let request = self.http.get(self.item_url(id));
        let response = self.execute(Operation::Get, request).await?;
        decode(Operation::Get, response).await
    }

    /// Fetch all beverages, in the order the API returns them.
    pub async fn list(&self) -> Result<Vec<Beverage>, ClientError> {
        let request = self.http.get(self.collection_url());
        let response = self.execute(Operation::List, request).await?;
        let beverages: Vec<Beverage> = decode(Operation::List, response).await?;
        debug!(count = beverages.len(), "Beverages listed");
        Ok(beverages)
    }

    /// Replace the name and type of an existing beverage.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        beverage_type: &str,
    ) -> Result<Beverage, ClientError> {
        let body = BeverageRequest::new(name, beverage_type);
        let request = self.http.put(self.item_url(id)).json(&body);
        let response = self.execute(Operation::Update, request).await?;
        decode(Operation::Update, response).await
    }

    /// Delete a beverage. The response body is ignored on success.
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let request = self.http.delete(self.item_url(id));
        self.execute(Operation::Delete, request).await?;
        debug!(id, "Beverage deleted");
        Ok(())
    }

    fn collection_url(&self) -> String {
        format!("{}/beverages", self.base_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/beverages/{}", self.base_url, id)
    }

    /// Send the request and require the operation's success status.
    async fn execute(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let request = request
            .build()
            .map_err(|source| ClientError::Request { operation, source })?;
        debug!(
            %operation,
            method = %request.method(),
            url = %request.url(),
            "Sending request"
        );

        let response = self.http.execute(request).await.map_err(|source| {
            error!(%operation, error = %source, "Request failed");
            ClientError::Transport { operation, source }
        })?;

        let status = response.status();
        if status != operation.expected_status() {
            let body = error_body(operation, response.text().await);
            warn!(%operation, %status, "Unexpected response status");
            return Err(ClientError::UnexpectedStatus {
                operation,
                status,
                body,
            });
        }

        Ok(response)
    }
}

/// Body of a failed response. The status is what matters, so a body that
/// cannot be read is reported as empty.
fn error_body(operation: Operation, body: Result<String, reqwest::Error>) -> String {
    body.unwrap_or_else(|err| {
        warn!(%operation, error = %err, "Failed to read error response body");
        String::new()
    })
}

async fn decode<T: DeserializeOwned>(
    operation: Operation,
    response: Response,
) -> Result<T, ClientError> {
    let body = response
        .text()
        .await
        .map_err(|source| ClientError::Transport { operation, source })?;
    serde_json::from_str(&body).map_err(|source| ClientError::decode(operation, source, &body))
}

fn normalize_base_url(base_url: &str) -> Result<String, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not contain a query or fragment".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use reqwest::StatusCode;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn client_for(server: &Server) -> BeverageClient {
        BeverageClient::new(&server.url()).unwrap()
    }

    #[test]
    fn test_base_url_normalization() {
        let client = BeverageClient::new("http://api.local/").unwrap();
        assert_eq!(client.base_url(), "http://api.local");
        assert_eq!(client.collection_url(), "http://api.local/beverages");
        assert_eq!(client.item_url(7), "http://api.local/beverages/7");

        let client = BeverageClient::new("https://example.com/api/v1").unwrap();
        assert_eq!(client.item_url(1), "https://example.com/api/v1/beverages/1");
    }

    #[test]
    fn test_invalid_base_urls() {
        for url in ["", "not a url", "ftp://api.local", "http://api.local?x=1"] {
            let err = BeverageClient::new(url).unwrap_err();
            assert!(
                matches!(err, ClientError::InvalidBaseUrl { .. }),
                "expected InvalidBaseUrl for {url:?}, got {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_create_beverage() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/beverages")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "Latte", "type": "coffee"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":7,"name":"Latte","type":"coffee"}"#)
            .create_async()
            .await;

        let beverage = client_for(&server).create("Latte", "coffee").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            beverage,
            Beverage {
                id: 7,
                name: "Latte".to_string(),
                beverage_type: "coffee".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_create_requires_201() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/beverages")
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Latte","type":"coffee"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .create("Latte", "coffee")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert_eq!(err.operation(), Some(Operation::Create));
    }

    #[tokio::test]
    async fn test_create_rejected_carries_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/beverages")
            .with_status(422)
            .with_body("name already taken")
            .create_async()
            .await;

        let err = client_for(&server)
            .create("Latte", "coffee")
            .await
            .unwrap_err();
        match &err {
            ClientError::UnexpectedStatus { status, body, .. } => {
                assert_eq!(*status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(body, "name already taken");
            }
            other => panic!("expected unexpected-status error, got {other:?}"),
        }
        assert!(err.to_string().contains("name already taken"));
    }

    #[tokio::test]
    async fn test_get_beverage() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/beverages/7")
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Latte","type":"coffee"}"#)
            .create_async()
            .await;

        let beverage = client_for(&server).get(7).await.unwrap();

        mock.assert_async().await;
        assert_eq!(beverage.id, 7);
        assert_eq!(beverage.name, "Latte");
        assert_eq!(beverage.beverage_type, "coffee");
    }

    #[tokio::test]
    async fn test_get_missing_is_unexpected_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/beverages/99")
            .with_status(404)
            .with_body(r#"{"error":"not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server).get(99).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains(r#"{"error":"not found"}"#));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/beverages/7")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).get(7).await.unwrap_err();
        match &err {
            ClientError::Decode { operation, body, .. } => {
                assert_eq!(*operation, Operation::Get);
                assert_eq!(body, "<html>not json</html>");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/beverages")
            .with_status(200)
            .with_body(r#"{"id":1,"name":"Tea","type":"tea"}"#)
            .create_async()
            .await;

        let err = client_for(&server).list().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Decode {
                operation: Operation::List,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_list_preserves_order() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/beverages")
            .with_status(200)
            .with_body(
                json!([
                    {"id": 3, "name": "Chai", "type": "tea"},
                    {"id": 1, "name": "Latte", "type": "coffee"}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let beverages = client_for(&server).list().await.unwrap();
        let ids: Vec<i64> = beverages.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/beverages")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let beverages = assert_ok!(client_for(&server).list().await);
        assert!(beverages.is_empty());
    }

    #[tokio::test]
    async fn test_update_beverage() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/beverages/7")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "Flat White", "type": "coffee"})))
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Flat White","type":"coffee"}"#)
            .create_async()
            .await;

        let beverage = client_for(&server)
            .update(7, "Flat White", "coffee")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(beverage.id, 7);
        assert_eq!(beverage.name, "Flat White");
    }

    #[tokio::test]
    async fn test_update_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", "/beverages/7")
            .with_status(500)
            .with_body("database unavailable")
            .create_async()
            .await;

        let err = client_for(&server)
            .update(7, "Flat White", "coffee")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.to_string().starts_with("Failed to update beverage"));
    }

    #[tokio::test]
    async fn test_delete_beverage() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/beverages/7")
            .with_status(200)
            .create_async()
            .await;

        assert_ok!(client_for(&server).delete(7).await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_requires_200() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/beverages/7")
            .with_status(204)
            .create_async()
            .await;

        let err = assert_err!(client_for(&server).delete(7).await);
        assert_eq!(err.status(), Some(StatusCode::NO_CONTENT));
    }

    #[tokio::test]
    async fn test_unreadable_error_body_is_empty() {
        let read_failure = reqwest::Client::new()
            .get("http://127.0.0.1:1")
            .send()
            .await
            .unwrap_err();
        assert_eq!(error_body(Operation::Get, Err(read_failure)), "");
        assert_eq!(
            error_body(Operation::Get, Ok("not found".to_string())),
            "not found"
        );
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 1.
        let client = BeverageClient::new("http://127.0.0.1:1").unwrap();
        let err = client.list().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport {
                operation: Operation::List,
                ..
            }
        ));
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_calls_on_clones() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/beverages/\d+$".to_string()))
            .with_status(200)
            .with_body(r#"{"id":1,"name":"Tea","type":"tea"}"#)
            .expect(4)
            .create_async()
            .await;

        let client = client_for(&server);
        let handles: Vec<_> = (1..=4)
            .map(|id| {
                let client = client.clone();
                tokio::spawn(async move { client.get(id).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_with_timeout() {
        let client = BeverageClient::with_timeout("http://api.local", Duration::from_secs(5));
        assert_ok!(client);
    }
}
