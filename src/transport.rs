use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::config::{Credentials, ServiceConfig};
use crate::error::{Result, WcsError};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends GET requests on behalf of [`crate::WebCoverageService`].
///
/// Implementations return `Err` only when no response was received at all;
/// non-2xx answers are returned as they are.
pub trait Transport {
    fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// Blocking HTTP transport on top of `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("wcs-client-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("wcs-client-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()
            .map_err(|e| WcsError::Transport {
                url: config.endpoint.clone(),
                status: None,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            credentials: config.credentials.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<HttpResponse> {
        debug!(url, ?params, "sending request");

        let mut request = self.http.get(url).query(params);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().map_err(|e| transport_error(url, e))?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| transport_error(url, e))?;
        debug!(url, status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> WcsError {
    let message = if err.is_timeout() {
        format!("timed out: {err}")
    } else {
        err.to_string()
    };
    WcsError::Transport {
        url: url.to_string(),
        status: err.status().map(|s| s.as_u16()),
        message,
    }
}
