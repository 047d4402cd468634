use log::debug;

use dealmap_core::response::{
    transform_deal_details, transform_search_response, BUSINESS_TAG, DEAL_TAG,
};
use dealmap_core::{AttributeSet, QueryParams, SearchResult};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("dealmap/", env!("CARGO_PKG_VERSION"));

const SEARCH_DEALS_PATH: &str = "/search/deals/";
const SEARCH_BUSINESSES_PATH: &str = "/search/businesses/";

/// Dealmap API client.
///
/// Every method performs exactly one GET and returns the parsed result; nothing
/// is retried or cached. Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct Client {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for the public API endpoint.
    ///
    /// Fails with [`Error::MissingApiKey`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        // Handle base_url that may or may not have trailing slash
        let base_url = config.base_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let http = match config.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().user_agent(USER_AGENT).build()?,
        };

        Ok(Self {
            api_key: config.api_key,
            base_url,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search deals (`GET /search/deals/`).
    pub async fn search_deals(&self, params: &QueryParams) -> Result<SearchResult> {
        self.search(SEARCH_DEALS_PATH, DEAL_TAG, params).await
    }

    /// Search businesses (`GET /search/businesses/`).
    pub async fn search_businesses(&self, params: &QueryParams) -> Result<SearchResult> {
        self.search(SEARCH_BUSINESSES_PATH, BUSINESS_TAG, params).await
    }

    /// Fetch a single deal (`GET /deals/{deal_id}`).
    ///
    /// A well-formed response without a `<Deal>` element is reported as
    /// [`Error::NotFound`].
    pub async fn deal_details(&self, deal_id: &str, params: &QueryParams) -> Result<AttributeSet> {
        let path = format!("/deals/{}", urlencoding::encode(deal_id));
        let body = self.get(&path, params).await?;

        let deal =
            transform_deal_details(&body)?.ok_or_else(|| Error::NotFound(deal_id.to_string()))?;
        debug!("Deal {deal_id} has {} attributes", deal.len());

        Ok(deal)
    }

    async fn search(&self, path: &str, record_tag: &str, params: &QueryParams) -> Result<SearchResult> {
        let body = self.get(path, params).await?;

        let result = transform_search_response(&body, record_tag)?;
        debug!(
            "{path} returned {} <{record_tag}> records of {} total",
            result.records.len(),
            result.total
        );

        Ok(result)
    }

    async fn get(&self, path: &str, params: &QueryParams) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let query = params.with_api_key(&self.api_key);
        debug!("GET {url} with params {:?}", query.names());

        let query_pairs: Vec<(&str, &str)> = query.iter().collect();
        let response = self
            .http
            .get(&url)
            .query(&query_pairs)
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        debug!("GET {url} -> {status}");
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("GET {url}: could not read error body: {}", e.without_url());
                    String::new()
                }
            };
            return Err(Error::Status { status, body });
        }

        response.text().await.map_err(redact)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Drop the request URL from a transport error; its query carries the key.
fn redact(error: reqwest::Error) -> Error {
    Error::Transport(error.without_url())
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let invalid = |reason: String| Error::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("unsupported scheme {scheme}"))),
    }
    if parsed.query().is_some() {
        return Err(invalid("base URL cannot carry a query string".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use dealmap_core::SearchOptions;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const SEARCH_DEALS_MIAMI: &str = include_str!("../../core/fixtures/search_deals_miami.xml");
    const SEARCH_BUSINESSES_SEATTLE: &str =
        include_str!("../../core/fixtures/search_businesses_seattle.xml");
    const DEAL_DETAILS: &str = include_str!("../../core/fixtures/deal_details.xml");

    /// Serve one canned response on a local port; the handle yields the
    /// request target (path and query) that the client sent.
    async fn replay(status_line: &'static str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request = String::from_utf8_lossy(&request).to_string();
            let request_line = request.lines().next().unwrap_or_default().to_string();
            request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn client_for(base_url: &str) -> Client {
        Client::from_config(ClientConfig::new("12345").with_base_url(base_url)).unwrap()
    }

    fn split_target(target: &str) -> (String, Vec<(String, String)>) {
        let url = reqwest::Url::parse(&format!("http://localhost{target}")).unwrap();
        let pairs = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        (url.path().to_string(), pairs)
    }

    #[test]
    fn test_new_without_api_key() {
        let err = Client::new("").unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        assert!(matches!(Client::new("   "), Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_new_with_api_key() {
        let client = Client::new("12345").unwrap();
        assert_eq!(client.base_url(), "http://api.thedealmap.com");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = client_for("http://localhost:9000/api/");
        assert_eq!(client.base_url(), "http://localhost:9000/api");
    }

    #[test]
    fn test_invalid_base_url() {
        for url in ["not a url", "ftp://api.thedealmap.com", "http://host/?x=1"] {
            let result = Client::from_config(ClientConfig::new("12345").with_base_url(url));
            let err = result.unwrap_err();
            assert!(
                matches!(err, Error::InvalidBaseUrl { .. }),
                "expected InvalidBaseUrl for {url}, got {err:?}"
            );
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[tokio::test]
    async fn test_search_deals() {
        let (base_url, server) = replay("200 OK", SEARCH_DEALS_MIAMI).await;
        let client = client_for(&base_url);

        let result = client
            .search_deals(&SearchOptions::location("Miami, FL").to_params())
            .await
            .unwrap();

        assert_eq!(result.records.len(), 20);
        assert_eq!(result.total, 562);
        assert_eq!(
            result.records[0].get("id"),
            Some("5-EE22936BCFB0E2E1C6AE028D3A17928A")
        );

        let (path, query) = split_target(&server.await.unwrap());
        assert_eq!(path, "/search/deals/");
        assert_eq!(
            query,
            vec![
                ("key".to_string(), "12345".to_string()),
                ("l".to_string(), "Miami, FL".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_overrides_caller_api_key() {
        let (base_url, server) = replay("200 OK", SEARCH_DEALS_MIAMI).await;
        let client = client_for(&base_url);

        let params: QueryParams = [("l", "Miami, FL"), ("key", "someone-else")]
            .into_iter()
            .collect();
        client.search_deals(&params).await.unwrap();

        let (_, query) = split_target(&server.await.unwrap());
        let keys: Vec<&str> = query
            .iter()
            .filter(|(k, _)| k == "key")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(keys, vec!["12345"]);
    }

    #[tokio::test]
    async fn test_search_businesses() {
        let (base_url, server) = replay("200 OK", SEARCH_BUSINESSES_SEATTLE).await;
        let client = client_for(&base_url);

        let result = client
            .search_businesses(&SearchOptions::location("Seattle, WA").to_params())
            .await
            .unwrap();

        assert_eq!(result.records.len(), 3);
        assert_eq!(result.total, 41);
        assert_eq!(result.records[2].get("name"), Some("Elliott Bay Book Company"));

        let (path, _) = split_target(&server.await.unwrap());
        assert_eq!(path, "/search/businesses/");
    }

    #[tokio::test]
    async fn test_deal_details() {
        let (base_url, server) = replay("200 OK", DEAL_DETAILS).await;
        let client = client_for(&base_url);

        let deal = client
            .deal_details("5-EE22936BCFB0E2E1C6AE028D3A17928A", &QueryParams::new())
            .await
            .unwrap();

        assert_eq!(deal.get("id"), Some("5-EE22936BCFB0E2E1C6AE028D3A17928A"));
        assert_eq!(deal.get("zip_code"), Some("33135"));

        let (path, query) = split_target(&server.await.unwrap());
        assert_eq!(path, "/deals/5-EE22936BCFB0E2E1C6AE028D3A17928A");
        assert_eq!(query, vec![("key".to_string(), "12345".to_string())]);
    }

    #[tokio::test]
    async fn test_deal_details_encodes_id() {
        let (base_url, server) = replay("200 OK", DEAL_DETAILS).await;
        let client = client_for(&base_url);

        client
            .deal_details("a b/c", &QueryParams::new())
            .await
            .unwrap();

        let (path, _) = split_target(&server.await.unwrap());
        assert_eq!(path, "/deals/a%20b%2Fc");
    }

    #[tokio::test]
    async fn test_deal_details_not_found() {
        let (base_url, _server) = replay("200 OK", "<DealResponse/>").await;
        let client = client_for(&base_url);

        let err = client
            .deal_details("missing", &QueryParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(ref id) if id == "missing"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_xml_is_parse_error() {
        let malformed = "<DealSearchResults><Results><Deal><ID>1</ID></Results>";

        let (base_url, _server) = replay("200 OK", malformed).await;
        let err = client_for(&base_url)
            .search_deals(&QueryParams::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let (base_url, _server) = replay("200 OK", malformed).await;
        let err = client_for(&base_url)
            .search_businesses(&QueryParams::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let (base_url, _server) = replay("200 OK", malformed).await;
        let err = client_for(&base_url)
            .deal_details("1", &QueryParams::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_missing_total_is_parse_error() {
        let (base_url, _server) = replay("200 OK", "<R><Deal><ID>1</ID></Deal></R>").await;

        let err = client_for(&base_url)
            .search_deals(&QueryParams::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Parse(dealmap_core::ParseError::MissingElement("TotalResults"))
        ));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (base_url, _server) = replay("403 Forbidden", "Invalid key").await;

        let err = client_for(&base_url)
            .search_deals(&QueryParams::new())
            .await
            .unwrap_err();

        match err {
            Error::Status { status, ref body } => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
                assert_eq!(body, "Invalid key");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_with_truncated_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut chunk = [0u8; 1024];
            socket.read(&mut chunk).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\nshort")
                .await
                .unwrap();
        });

        let err = client_for(&format!("http://{addr}"))
            .search_deals(&QueryParams::new())
            .await
            .unwrap_err();

        match err {
            Error::Status { status, ref body } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert!(body.is_empty());
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{addr}"))
            .search_deals(&QueryParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.to_string().contains("12345"));
        assert!(!format!("{err:?}").contains("12345"));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = Client::new("SECRET-KEY").unwrap();
        let debug = format!("{client:?}");

        assert!(!debug.contains("SECRET-KEY"));
        assert!(debug.contains("api_key: \"***\""));
        assert!(debug.contains("http://api.thedealmap.com"));
    }
}
