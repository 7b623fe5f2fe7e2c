//! Endpoints of the analysis service.

use lisa_map_analysis::to_form_params;
use lisa_map_analysis_models::AnalysisConfig;
use lisa_map_client_models::{DatasetFile, parse_headers};
use lisa_map_payload::normalize_str;
use lisa_map_payload_models::FeatureCollection;

use crate::ClientError;

/// Environment variable holding the service base URL.
pub const API_BASE_ENV: &str = "LISA_MAP_API_BASE";

/// Base URL used when [`API_BASE_ENV`] is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Client for the analysis service REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url`. A trailing `/` is ignored.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client for the base URL in [`API_BASE_ENV`], falling
    /// back to [`DEFAULT_API_BASE`].
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(&base_url)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists uploaded datasets.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the response is not
    /// a dataset list.
    pub async fn list_files(&self) -> Result<Vec<DatasetFile>, ClientError> {
        let body = self.get_text(&format!("{}/list", self.base_url)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches the column names of dataset `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the response is not
    /// JSON.
    pub async fn fetch_headers(&self, id: &str) -> Result<Vec<String>, ClientError> {
        let body = self
            .get_text(&format!("{}/files/{id}/headers", self.base_url))
            .await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        let columns = parse_headers(&value);
        log::debug!("Dataset {id} has {} columns", columns.len());
        Ok(columns)
    }

    /// Submits `config` for dataset `id` and normalizes the result.
    ///
    /// `Ok(None)` means the service answered but returned nothing
    /// renderable.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the service answers
    /// with a non-success status.
    pub async fn run_analysis(
        &self,
        id: &str,
        config: &AnalysisConfig,
    ) -> Result<Option<FeatureCollection>, ClientError> {
        let url = format!("{}/lisa/{id}", self.base_url);
        let params = to_form_params(config);
        log::info!(
            "Running {} analysis of '{}' on dataset {id}",
            config.wtype,
            config.variable
        );

        log::debug!("POST {url}");
        let resp = self.client.post(&url).form(&params).send().await?;
        let body = read_body(resp).await?;
        let collection = normalize_str(&body);
        if let Some(collection) = &collection {
            log::info!("Analysis returned {} features", collection.len());
        }
        Ok(collection)
    }

    /// URL of the saved result artifact for dataset `id`.
    #[must_use]
    pub fn saved_result_url(&self, id: &str) -> String {
        format!("{}/geojsons/lisa-{id}.geojson", self.base_url)
    }

    /// Fetches the saved result artifact for dataset `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn fetch_saved_result(
        &self,
        id: &str,
    ) -> Result<Option<FeatureCollection>, ClientError> {
        let body = self.get_text(&self.saved_result_url(id)).await?;
        Ok(normalize_str(&body))
    }

    /// Fetches the most recent cached result.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn fetch_cache(&self) -> Result<Option<FeatureCollection>, ClientError> {
        let body = self.get_text(&format!("{}/cache", self.base_url)).await?;
        Ok(normalize_str(&body))
    }

    async fn get_text(&self, url: &str) -> Result<String, ClientError> {
        log::debug!("GET {url}");
        let resp = self.client.get(url).send().await?;
        read_body(resp).await
    }
}

async fn read_body(resp: reqwest::Response) -> Result<String, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    log::warn!("Request failed with status {status}");
    let message = if body.trim().is_empty() {
        format!("Request failed ({})", status.as_u16())
    } else {
        body
    };
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one HTTP response and returns the raw request it received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some((head, rest)) = text.split_once("\r\n\r\n") {
                    let length = head
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if rest.len() >= length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (base, handle)
    }

    #[test]
    fn trims_trailing_slash() {
        let api = ApiClient::new("http://example.test/api/");
        assert_eq!(api.base_url(), "http://example.test/api");
        assert_eq!(
            api.saved_result_url("12"),
            "http://example.test/api/geojsons/lisa-12.geojson"
        );
    }

    #[tokio::test]
    async fn run_posts_form_and_normalizes_array_response() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"rate":1}}]},{"type":"FeatureCollection","features":[]}]"#,
        )
        .await;
        let config = AnalysisConfig {
            variable: "rate".to_string(),
            county_col: "county".to_string(),
            ..AnalysisConfig::default()
        };

        let collection = ApiClient::new(&base)
            .run_analysis("5", &config)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(collection.len(), 1);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /lisa/5 "));
        assert!(request.contains("application/x-www-form-urlencoded"));
        assert!(request.contains("level=adm2&variable=rate&join_by=name&county_col=county"));
    }

    #[tokio::test]
    async fn error_status_uses_body_as_message() {
        let (base, _server) = serve_once("400 Bad Request", "Variable not numeric").await;
        let err = ApiClient::new(&base)
            .run_analysis("5", &AnalysisConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Variable not numeric");
        assert!(matches!(err, ClientError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn empty_error_body_gets_generic_message() {
        let (base, _server) = serve_once("502 Bad Gateway", "").await;
        let err = ApiClient::new(&base).fetch_cache().await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed (502)");
    }

    #[tokio::test]
    async fn headers_tolerate_bare_arrays() {
        let (base, server) = serve_once("200 OK", r#"["county","rate"]"#).await;
        let columns = ApiClient::new(&base).fetch_headers("9").await.unwrap();
        assert_eq!(columns, vec!["county".to_string(), "rate".to_string()]);
        assert!(server.await.unwrap().starts_with("GET /files/9/headers "));
    }

    #[tokio::test]
    async fn fetches_saved_result_artifact() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"cluster":"HH"}},{"type":"Feature","properties":{"cluster":"ns"}}]}"#,
        )
        .await;
        let collection = ApiClient::new(&base)
            .fetch_saved_result("7")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(collection.len(), 2);
        assert!(
            server
                .await
                .unwrap()
                .starts_with("GET /geojsons/lisa-7.geojson ")
        );
    }

    #[tokio::test]
    async fn saved_result_without_features_is_none() {
        let (base, _server) = serve_once("200 OK", "null").await;
        let result = ApiClient::new(&base).fetch_saved_result("7").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn lists_files() {
        let (base, _server) =
            serve_once("200 OK", r#"[{"id":1,"file_name":"a.csv"}]"#).await;
        let files = ApiClient::new(&base).list_files().await.unwrap();
        assert_eq!(files[0].id, "1");
        assert_eq!(files[0].file_name, "a.csv");
    }
}
