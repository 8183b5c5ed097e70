//! The BBC Monitoring API client.
//!
//! [`MonitoringClient`] owns exactly one [`Session`]. Constructing the client
//! reads the credentials file and logs in; [`MonitoringClient::end_session`]
//! logs out and consumes the client. Requests never re-authenticate: once the
//! server drops the login, calls fail with the mapped error and the caller
//! builds a new client.
//!
//! # Example
//!
//! ```ignore
//! let client = MonitoringClient::connect(&ClientConfig::default()).await?;
//! let article = client.fetch_by_id("1ds9ezq2").await?;
//! println!("{}", extract_body_text(&article)?);
//! client.end_session().await;
//! ```

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{ApiError, map_status};
use crate::models::{Article, SearchResult};
use crate::session::Session;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Build the HTTP client a session runs on.
pub fn build_http_client() -> Result<Client, ApiError> {
    Ok(Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .cookie_store(true)
        .build()?)
}

/// A logged-in client for the BBC Monitoring API.
#[derive(Debug)]
pub struct MonitoringClient {
    session: Session,
}

impl MonitoringClient {
    /// Read the credentials named by `config` and log in.
    #[instrument(level = "info", skip_all, fields(base_url = %config.base_url))]
    pub async fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;
        let credentials = Credentials::from_file(&config.api_key_path)?;
        Self::login(build_http_client()?, &base_url, credentials).await
    }

    /// Log in with credentials already in hand.
    pub async fn login(
        http: Client,
        base_url: &Url,
        credentials: Credentials,
    ) -> Result<Self, ApiError> {
        let session = Session::initialize(http, base_url, credentials).await?;
        Ok(Self { session })
    }

    pub fn base_url(&self) -> &Url {
        self.session.base_url()
    }

    /// Fetch a product by id.
    ///
    /// # Errors
    ///
    /// Any status other than 200 is reported as
    /// [`ApiError::ResourceNotFound`] carrying the product URL. A body that
    /// is not a JSON object is [`ApiError::Json`].
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_by_id(&self, id: &str) -> Result<Article, ApiError> {
        let url = self.product_url(id)?;
        debug!(%url, "Fetching product");

        let response = self.session.http().get(url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), %url, "Product not available");
            return Err(ApiError::ResourceNotFound {
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let article: Article = serde_json::from_str(&body)?;
        info!(
            title = article.title().unwrap_or_default(),
            "Fetched product"
        );
        Ok(article)
    }

    /// Search for products whose headline matches `query`.
    ///
    /// A `limit` of 0 means no cap, and is not sent.
    ///
    /// # Errors
    ///
    /// Non-200 responses go through [`map_status`].
    #[instrument(level = "info", skip(self))]
    pub async fn search_headlines(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<SearchResult, ApiError> {
        let url = self.search_url(query, limit)?;
        debug!(%url, "Searching headlines");

        let response = self.session.http().get(url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), %url, "Headline search rejected");
            return Err(map_status(status, url.as_str(), self.session.login()));
        }

        let body = response.text().await?;
        let result: SearchResult = serde_json::from_str(&body)?;
        info!("Headline search complete");
        Ok(result)
    }

    /// Log out and drop the session. Never fails.
    pub async fn end_session(self) {
        self.session.terminate().await;
    }

    fn product_url(&self, id: &str) -> Result<Url, ApiError> {
        // URL parsing resolves dot segments, even percent-encoded ones
        if matches!(id, "" | "." | "..") {
            return Err(ApiError::InvalidProductId { id: id.to_string() });
        }
        let path = format!("product/{}", urlencoding::encode(id));
        Ok(self.base_url().join(&path)?)
    }

    fn search_url(&self, query: &str, limit: Option<u32>) -> Result<Url, ApiError> {
        let mut url = self.base_url().join("search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("headline", query);
            if let Some(limit) = limit.filter(|n| *n > 0) {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::normalize_base_url;
    use crate::parse::extract_body_text;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    async fn logged_in(server: &mut ServerGuard) -> MonitoringClient {
        let _login = server
            .mock("POST", "/login/")
            .with_status(204)
            .create_async()
            .await;
        let base = normalize_base_url(&server.url()).unwrap();
        MonitoringClient::login(
            build_http_client().unwrap(),
            &base,
            Credentials::new("bob", "secret"),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_connect_reads_credentials_file() {
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/login/")
            .match_body(Matcher::Json(json!({"username": "bob", "password": "secret"})))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join("api_key.json");
        let mut f = std::fs::File::create(&key_path).unwrap();
        f.write_all(br#"[{"username": "bob", "password": "secret"}]"#)
            .unwrap();

        let config = ClientConfig {
            base_url: server.url(),
            api_key_path: key_path,
        };
        let client = MonitoringClient::connect(&config).await.unwrap();
        login.assert_async().await;
        assert!(client.base_url().as_str().ends_with('/'));
    }

    #[tokio::test]
    async fn test_connect_without_credentials_sends_nothing() {
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/login/")
            .with_status(204)
            .expect(0)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let config = ClientConfig {
            base_url: server.url(),
            api_key_path: dir.path().join("missing.json"),
        };
        let err = MonitoringClient::connect(&config).await.unwrap_err();
        assert!(matches!(err, ApiError::CredentialsRead { .. }));
        login.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_by_id_returns_body_unchanged() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let body = json!({
            "id": "X",
            "title": "Wildfire spreads",
            "bodyHtml": "<h1>Wildfire</h1><p class=\"text\">Crews  are\n responding.</p>",
            "sources": [{"name": "Radio"}]
        });
        let _product = server
            .mock("GET", "/product/X")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let article = client.fetch_by_id("X").await.unwrap();
        assert_eq!(serde_json::to_value(&article).unwrap(), body);
        assert_eq!(
            extract_body_text(&article).unwrap(),
            "Crews  are responding."
        );
    }

    #[tokio::test]
    async fn test_fetch_by_id_keeps_null_body_html() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let body = json!({"id": "X", "bodyHtml": null, "title": "Audio only"});
        let _product = server
            .mock("GET", "/product/X")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let article = client.fetch_by_id("X").await.unwrap();
        assert_eq!(serde_json::to_value(&article).unwrap(), body);
        assert!(matches!(
            extract_body_text(&article).unwrap_err(),
            ApiError::MissingBodyHtml
        ));
    }

    #[tokio::test]
    async fn test_fetch_by_id_non_object_body_is_json_error() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _product = server
            .mock("GET", "/product/X")
            .with_status(200)
            .with_body("[1, 2, 3]")
            .create_async()
            .await;

        assert!(matches!(
            client.fetch_by_id("X").await.unwrap_err(),
            ApiError::Json(_)
        ));
    }

    #[tokio::test]
    async fn test_session_cookie_is_reused() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", "/login/")
            .with_status(204)
            .with_header("set-cookie", "sid=abc; Path=/")
            .create_async()
            .await;
        let product = server
            .mock("GET", "/product/X")
            .match_header("cookie", Matcher::Regex("sid=abc".into()))
            .with_status(200)
            .with_body(r#"{"id": "X"}"#)
            .expect(1)
            .create_async()
            .await;
        let search = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .match_header("cookie", Matcher::Regex("sid=abc".into()))
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .expect(1)
            .create_async()
            .await;

        let base = normalize_base_url(&server.url()).unwrap();
        let client = MonitoringClient::login(
            build_http_client().unwrap(),
            &base,
            Credentials::new("bob", "secret"),
        )
        .await
        .unwrap();

        client.fetch_by_id("X").await.unwrap();
        client.search_headlines("fire", None).await.unwrap();
        product.assert_async().await;
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_by_id_not_found() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _product = server
            .mock("GET", "/product/X")
            .with_status(404)
            .create_async()
            .await;

        let err = client.fetch_by_id("X").await.unwrap_err();
        match err {
            ApiError::ResourceNotFound { url } => {
                assert_eq!(url, format!("{}/product/X", server.url()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_by_id_any_failure_is_not_found() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _product = server
            .mock("GET", "/product/X")
            .with_status(402)
            .create_async()
            .await;

        assert!(matches!(
            client.fetch_by_id("X").await.unwrap_err(),
            ApiError::ResourceNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_product_url_encodes_id() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let url = client.product_url("a/b c").unwrap();
        assert_eq!(url.path(), "/product/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_product_url_rejects_dot_segments() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        for id in ["", ".", ".."] {
            assert!(matches!(
                client.fetch_by_id(id).await.unwrap_err(),
                ApiError::InvalidProductId { .. }
            ));
        }
        assert_eq!(client.product_url("a.b").unwrap().path(), "/product/a.b");
    }

    #[tokio::test]
    async fn test_search_url_contains_query_and_limit() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;

        let url = client.search_url("fire", Some(5)).unwrap();
        assert_eq!(url.path(), "/search");
        assert!(url.as_str().contains("headline=fire"));
        assert!(url.as_str().contains("limit=5"));

        let url = client.search_url("fire", None).unwrap();
        assert!(!url.as_str().contains("limit"));

        // zero means no cap
        let url = client.search_url("fire", Some(0)).unwrap();
        assert!(!url.as_str().contains("limit"));
    }

    #[tokio::test]
    async fn test_search_headlines_passes_json_through() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let body = json!({"results": [{"id": "X", "headline": "Forest fire"}], "total": 1});
        let search = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("headline".into(), "forest fire".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await;

        let result = client.search_headlines("forest fire", Some(5)).await.unwrap();
        search.assert_async().await;
        assert_eq!(result.into_inner(), body);
    }

    #[tokio::test]
    async fn test_search_headlines_maps_errors() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _search = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let err = client.search_headlines("fire", None).await.unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed { .. }));
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_end_session_logs_out() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let logout = server
            .mock("POST", "/logout")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        client.end_session().await;
        logout.assert_async().await;
    }
}
