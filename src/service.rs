use std::collections::BTreeMap;
use tracing::warn;

use crate::config::ServiceConfig;
use crate::error::{Result, WcsError, format_exceptions, parse_exception_report};
use crate::model::{BasicCoverage, FullCoverage};
use crate::parser::{coverage_descriptions, parse_capabilities, parse_description};
use crate::transport::{HttpTransport, Transport};
use crate::xml::Element;

const WCS_VERSION: &str = "2.1.0";
const NO_SUCH_COVERAGE: &str = "NoSuchCoverage";

/// Client of a single WCS endpoint.
///
/// Every call makes one request and parses its response; nothing is cached.
pub struct WebCoverageService {
    endpoint: String,
    transport: Box<dyn Transport>,
}

impl WebCoverageService {
    /// Creates a service over HTTP, with the timeouts and credentials of `config`.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config.endpoint, transport))
    }

    /// Creates a service using environment variables and/or `.wcsrc`.
    pub fn from_env() -> Result<Self> {
        Self::new(ServiceConfig::from_env()?)
    }

    /// Creates a service that sends its requests through `transport`.
    pub fn with_transport(endpoint: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport: Box::new(transport),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Lists the coverages of the GetCapabilities document, keyed by name.
    pub fn list_coverages(&self) -> Result<BTreeMap<String, BasicCoverage>> {
        let root = self.fetch(&[("service", "WCS"), ("request", "GetCapabilities")], None)?;
        parse_capabilities(&root)
    }

    /// Describes one coverage in full.
    ///
    /// Fails with [`WcsError::UnknownCoverage`] if the server does not know
    /// `name`, and with [`WcsError::AmbiguousResponse`] if it returns more
    /// than one description.
    pub fn list_full_info(&self, name: &str) -> Result<FullCoverage> {
        let params = [
            ("service", "WCS"),
            ("version", WCS_VERSION),
            ("request", "DescribeCoverage"),
            ("outputType", "GeneralGridCoverage"),
            ("coverageId", name),
        ];
        let root = self.fetch(&params, Some(name))?;

        match coverage_descriptions(&root).as_slice() {
            [] => Err(WcsError::UnknownCoverage(name.to_string())),
            [description] => parse_description(description),
            descriptions => Err(WcsError::AmbiguousResponse {
                name: name.to_string(),
                count: descriptions.len(),
            }),
        }
    }

    /// Sends one request and returns the root of the response document.
    ///
    /// OWS exception reports become errors; for `coverage` requests a
    /// `NoSuchCoverage` report is [`WcsError::UnknownCoverage`].
    fn fetch(&self, params: &[(&str, &str)], coverage: Option<&str>) -> Result<Element> {
        let response = self.transport.get(&self.endpoint, params)?;
        if !response.is_success() {
            warn!(url = %self.endpoint, status = response.status, "request failed");
        }

        let root = match Element::parse(&response.body) {
            Ok(root) => root,
            Err(_) if !response.is_success() => {
                return Err(self.http_error(
                    response.status,
                    String::from_utf8_lossy(&response.body).trim().to_string(),
                ));
            }
            Err(e) => return Err(e),
        };

        if let Some(exceptions) = parse_exception_report(&root) {
            if let Some(name) = coverage {
                if exceptions
                    .iter()
                    .any(|ex| ex.code.as_deref() == Some(NO_SUCH_COVERAGE))
                {
                    return Err(WcsError::UnknownCoverage(name.to_string()));
                }
            }
            return Err(self.http_error(response.status, format_exceptions(&exceptions)));
        }
        if !response.is_success() {
            return Err(self.http_error(
                response.status,
                String::from_utf8_lossy(&response.body).trim().to_string(),
            ));
        }
        Ok(root)
    }

    fn http_error(&self, status: u16, message: String) -> WcsError {
        WcsError::Transport {
            url: self.endpoint.clone(),
            status: Some(status),
            message,
        }
    }
}

impl std::fmt::Debug for WebCoverageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebCoverageService")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
