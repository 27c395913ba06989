pub mod error;
pub mod types;

pub use error::{Result, WikipediaError};
pub use types::{
    ImageRef, MediaItem, MediaListResponse, MediaSource, PageImagesPage, PageImagesQuery,
    PageImagesResponse, SummaryResponse,
};

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

/// Per-call timeout for every Wikipedia request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thumbnail width requested from the Action API.
const PAGE_IMAGE_THUMB_SIZE: &str = "1200";

pub struct WikipediaClient {
    client: reqwest::Client,
    /// Host template, `{lang}` is replaced with the language tag.
    host_template: String,
}

impl WikipediaClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_host_template(user_agent, "https://{lang}.wikipedia.org")
    }

    /// Point the client at a different host, e.g. a local mirror.
    pub fn with_host_template(user_agent: &str, host_template: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            host_template: host_template.trim_end_matches('/').to_string(),
        })
    }

    fn base(&self, lang: &str) -> Result<Url> {
        Ok(Url::parse(&self.host_template.replace("{lang}", lang))?)
    }

    /// REST endpoint with the title as a single escaped path segment.
    fn rest_url(&self, lang: &str, endpoint: &str, title: &str) -> Result<Url> {
        let mut url = self.base(lang)?;
        url.path_segments_mut()
            .map_err(|_| WikipediaError::InvalidUrl(self.host_template.clone()))?
            .pop_if_empty()
            .extend(["api", "rest_v1", "page", endpoint, title]);
        Ok(url)
    }

    /// Action API endpoint, kept under any path prefix of the host template.
    fn action_url(&self, lang: &str) -> Result<Url> {
        let mut url = self.base(lang)?;
        url.path_segments_mut()
            .map_err(|_| WikipediaError::InvalidUrl(self.host_template.clone()))?
            .pop_if_empty()
            .extend(["w", "api.php"]);
        Ok(url)
    }

    /// `GET /api/rest_v1/page/summary/{title}`.
    pub async fn summary(&self, title: &str, lang: &str) -> Result<SummaryResponse> {
        let url = self.rest_url(lang, "summary", title)?;
        self.get_json(url, "summary", title, lang).await
    }

    /// `GET /api/rest_v1/page/media-list/{title}`.
    pub async fn media_list(&self, title: &str, lang: &str) -> Result<MediaListResponse> {
        let url = self.rest_url(lang, "media-list", title)?;
        self.get_json(url, "media-list", title, lang).await
    }

    /// Action API `prop=pageimages` lookup, following redirects.
    pub async fn page_images(&self, title: &str, lang: &str) -> Result<PageImagesResponse> {
        let mut url = self.action_url(lang)?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("prop", "pageimages|info")
            .append_pair("inprop", "url")
            .append_pair("format", "json")
            .append_pair("pithumbsize", PAGE_IMAGE_THUMB_SIZE)
            .append_pair("piprop", "original|thumbnail")
            .append_pair("redirects", "1")
            .append_pair("titles", title);
        self.get_json(url, "pageimages", title, lang).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &str,
        title: &str,
        lang: &str,
    ) -> Result<T> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        tracing::debug!(endpoint, lang, title, status = status.as_u16(), "Wikipedia response");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WikipediaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WikipediaClient {
        WikipediaClient::new("platepic-test/0.1").unwrap()
    }

    #[test]
    fn rest_url_escapes_title_as_one_segment() {
        let url = client().rest_url("zh", "summary", "麻婆豆腐/辣").unwrap();
        assert_eq!(url.host_str(), Some("zh.wikipedia.org"));
        assert!(url.path().starts_with("/api/rest_v1/page/summary/"));
        assert!(url.path().ends_with("%E8%BE%A3"));
        assert!(!url.path().ends_with("/%E8%BE%A3"));
    }

    #[test]
    fn rest_url_escapes_spaces_and_parens() {
        let url = client().rest_url("en", "media-list", "Lion's head (food)").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/media-list/Lion's%20head%20(food)"
        );
    }

    #[test]
    fn custom_host_template() {
        let client =
            WikipediaClient::with_host_template("ua", "http://localhost:8080/{lang}/").unwrap();
        let url = client.rest_url("en", "summary", "Char siu").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/en/api/rest_v1/page/summary/Char%20siu"
        );
    }

    #[test]
    fn action_url_keeps_host_path_prefix() {
        let client =
            WikipediaClient::with_host_template("ua", "http://localhost:8080/{lang}/").unwrap();
        assert_eq!(
            client.action_url("en").unwrap().as_str(),
            "http://localhost:8080/en/w/api.php"
        );
        assert_eq!(
            self::client().action_url("zh").unwrap().as_str(),
            "https://zh.wikipedia.org/w/api.php"
        );
    }

    // -- Canned HTTP responses ---------------------------------------------

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer one connection with `status` and `body`; the handle yields the
    /// request head the server saw.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });
        (format!("http://{addr}/{{lang}}"), handle)
    }

    #[tokio::test]
    async fn summary_parses_ok_response() {
        let (host, server) = serve_once(
            "200 OK",
            r#"{"title":"Char siu","originalimage":{"source":"https://u/Char_siu.jpg"}}"#,
        )
        .await;
        let client = WikipediaClient::with_host_template("platepic-test/0.1", &host).unwrap();

        let resp = client.summary("Char siu", "en").await.unwrap();

        assert_eq!(resp.image_url().as_deref(), Some("https://u/Char_siu.jpg"));
        let head = server.await.unwrap();
        assert!(head.starts_with("GET /en/api/rest_v1/page/summary/Char%20siu HTTP/1.1"));
        assert!(head.to_lowercase().contains("user-agent: platepic-test/0.1"));
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let (host, server) = serve_once("404 Not Found", "not found").await;
        let client = WikipediaClient::with_host_template("ua", &host).unwrap();

        let err = client.media_list("不存在菜XYZ", "zh").await.unwrap_err();

        match err {
            WikipediaError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let (host, server) = serve_once("200 OK", "<html>!!").await;
        let client = WikipediaClient::with_host_template("ua", &host).unwrap();

        let err = client.summary("麻婆豆腐", "zh").await.unwrap_err();

        assert!(matches!(err, WikipediaError::Parse(_)), "got {err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn page_images_hits_action_api_under_prefix() {
        let (host, server) = serve_once("200 OK", "{}").await;
        let client = WikipediaClient::with_host_template("ua", &host).unwrap();

        let resp = client.page_images("Char siu", "en").await.unwrap();

        assert!(resp.image_url().is_none());
        let head = server.await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /en/w/api.php?action=query&prop=pageimages%7Cinfo"));
        assert!(request_line.contains("&redirects=1&titles=Char+siu "));
    }
}
