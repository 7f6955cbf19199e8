// File: src/client.rs
use crate::model::DuckRecord;

use futures::FutureExt;
use futures::future::BoxFuture;
use http::{Request, Response, StatusCode, Uri, header};
use http_body_util::BodyExt;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use log::{debug, warn};

type HttpsClient = Client<HttpsConnector<HttpConnector>, String>;

const USER_AGENT: &str = concat!("randuck/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The connection could not be established or broke mid-way.
    Transport(String),
    /// The server answered, but not with something we can use.
    Protocol(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(s) => write!(f, "transport error: {}", s),
            FetchError::Protocol(s) => write!(f, "protocol error: {}", s),
        }
    }
}

impl std::error::Error for FetchError {}

/// Anything that can hand out a random duck.
pub trait DuckSource: Send + Sync {
    fn fetch_duck(&self) -> BoxFuture<'_, Result<DuckRecord, FetchError>>;
}

/// Anything that can download the bytes behind an image URL.
pub trait ImageSource: Send + Sync {
    fn fetch_image<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;
}

#[cfg(not(target_os = "android"))]
fn tls_config() -> Result<rustls::ClientConfig, String> {
    let mut root_store = rustls::RootCertStore::empty();
    let result = rustls_native_certs::load_native_certs();
    for err in &result.errors {
        warn!("Skipping unreadable system certificate source: {}", err);
    }
    root_store.add_parsable_certificates(result.certs);
    if root_store.is_empty() {
        // Plain http endpoints still work; https ones will fail as transport errors.
        warn!("No valid system certificates found.");
    }
    Ok(rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth())
}

#[cfg(target_os = "android")]
fn tls_config() -> Result<rustls::ClientConfig, String> {
    use rustls_platform_verifier::ConfigVerifierExt;
    rustls::ClientConfig::with_platform_verifier().map_err(|e| e.to_string())
}

#[derive(Clone, Debug)]
pub struct DuckClient {
    http: HttpsClient,
    api_url: Uri,
}

impl DuckClient {
    pub fn new(api_url: &str) -> Result<Self, String> {
        let api_url: Uri = api_url
            .parse()
            .map_err(|e: http::uri::InvalidUri| e.to_string())?;
        if api_url.scheme().is_none() || api_url.authority().is_none() {
            return Err(format!("API URL must be absolute: {}", api_url));
        }

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config()?)
            .https_or_http()
            .enable_http1()
            .build();
        let http = Client::builder(TokioExecutor::new()).build(https_connector);
        Ok(Self { http, api_url })
    }

    pub fn api_url(&self) -> &Uri {
        &self.api_url
    }

    /// Asks the API for one random duck. Single attempt, no retry.
    pub async fn fetch_duck(&self) -> Result<DuckRecord, FetchError> {
        let (status, body) = self.get(self.api_url.clone(), "application/json").await?;
        if !status.is_success() {
            return Err(FetchError::Protocol(format!("unexpected status {}", status)));
        }
        let duck = DuckRecord::from_json(&body)
            .map_err(|e| FetchError::Protocol(format!("unexpected body: {}", e)))?;
        debug!("Fetched duck {}", duck.url);
        Ok(duck)
    }

    /// Downloads the image behind `url`, following redirects.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let uri: Uri = url
            .parse()
            .map_err(|e: http::uri::InvalidUri| FetchError::Protocol(format!("bad image URL: {}", e)))?;
        let (status, body) = self.get(uri, "image/*").await?;
        if !status.is_success() {
            return Err(FetchError::Protocol(format!("unexpected status {}", status)));
        }
        Ok(body)
    }

    async fn get(&self, mut uri: Uri, accept: &str) -> Result<(StatusCode, Vec<u8>), FetchError> {
        for _ in 0..=MAX_REDIRECTS {
            let request = Request::get(uri.clone())
                .header(header::ACCEPT, accept)
                .header(header::USER_AGENT, USER_AGENT)
                .body(String::new())
                .map_err(|e| FetchError::Protocol(e.to_string()))?;

            let response = self
                .http
                .request(request)
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            if response.status().is_redirection() {
                if let Some(next) = redirect_target(&uri, &response) {
                    debug!("Following redirect {} -> {}", uri, next);
                    uri = next;
                    continue;
                }
            }

            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?
                .to_bytes();
            return Ok((status, body.to_vec()));
        }
        Err(FetchError::Protocol(format!(
            "more than {} redirects",
            MAX_REDIRECTS
        )))
    }
}

/// Resolves a `Location` header against the URI that produced it. Paths
/// without a leading slash are relative to the current path's directory.
fn redirect_target<B>(current: &Uri, response: &Response<B>) -> Option<Uri> {
    let location = response.headers().get(header::LOCATION)?.to_str().ok()?;
    if let Ok(target) = location.parse::<Uri>()
        && target.scheme().is_some()
        && target.authority().is_some()
    {
        return Some(target);
    }
    let path = if location.starts_with('/') {
        location.to_string()
    } else {
        let base = current.path();
        let dir = &base[..base.rfind('/').map_or(0, |i| i + 1)];
        format!("{}{}", if dir.is_empty() { "/" } else { dir }, location)
    };
    let mut parts = current.clone().into_parts();
    parts.path_and_query = Some(path.parse().ok()?);
    Uri::from_parts(parts).ok()
}

impl DuckSource for DuckClient {
    fn fetch_duck(&self) -> BoxFuture<'_, Result<DuckRecord, FetchError>> {
        DuckClient::fetch_duck(self).boxed()
    }
}

impl ImageSource for DuckClient {
    fn fetch_image<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        DuckClient::fetch_image(self, url).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect(location: &str) -> Response<()> {
        Response::builder()
            .status(StatusCode::FOUND)
            .header(header::LOCATION, location)
            .body(())
            .unwrap()
    }

    #[test]
    fn test_new_rejects_relative_and_garbage_urls() {
        assert!(DuckClient::new("/api/v2/random").is_err());
        assert!(DuckClient::new("not a url").is_err());
    }

    #[test]
    fn test_redirect_absolute_location() {
        let current: Uri = "https://random-d.uk/api/1.jpg".parse().unwrap();
        let next = redirect_target(&current, &redirect("https://cdn.example.com/1.jpg")).unwrap();
        assert_eq!(next, "https://cdn.example.com/1.jpg");
    }

    #[test]
    fn test_redirect_relative_location_keeps_host() {
        let current: Uri = "https://random-d.uk/api/1.jpg".parse().unwrap();
        let next = redirect_target(&current, &redirect("/api/v2/1.jpg")).unwrap();
        assert_eq!(next, "https://random-d.uk/api/v2/1.jpg");
    }

    #[test]
    fn test_redirect_bare_relative_location_uses_current_dir() {
        let current: Uri = "https://random-d.uk/api/1.jpg?size=big".parse().unwrap();
        let next = redirect_target(&current, &redirect("next.jpg")).unwrap();
        assert_eq!(next, "https://random-d.uk/api/next.jpg");

        let root: Uri = "https://random-d.uk".parse().unwrap();
        let next = redirect_target(&root, &redirect("next.jpg?x=1")).unwrap();
        assert_eq!(next, "https://random-d.uk/next.jpg?x=1");
    }

    #[test]
    fn test_redirect_without_location() {
        let current: Uri = "https://random-d.uk/api/1.jpg".parse().unwrap();
        let response = Response::builder().status(StatusCode::FOUND).body(()).unwrap();
        assert_eq!(redirect_target(&current, &response), None);
    }

    #[test]
    fn test_error_display_names_the_kind() {
        assert_eq!(
            FetchError::Transport("connection refused".into()).to_string(),
            "transport error: connection refused"
        );
        assert!(FetchError::Protocol("unexpected status 500".into())
            .to_string()
            .starts_with("protocol error"));
    }
}
