use thiserror::Error;

use crate::xml::Element;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, WcsError>;

/// Errors produced while talking to a WCS server or mapping its documents.
///
/// Parsing errors are deterministic for a given document, so none of them is
/// worth retrying; only [`WcsError::Transport`] depends on the network.
#[derive(Debug, Error)]
pub enum WcsError {
    /// The request could not be sent, timed out, or the server answered with a
    /// non-2xx status.
    #[error("request to {url} failed{}: {message}", status_suffix(.status))]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// A CRS identifier could not be split into components.
    #[error("malformed CRS '{crs}': {reason}")]
    MalformedCrs { crs: String, reason: String },

    /// A required element (or attribute) is absent from the document.
    #[error("no {element} found under {parent}")]
    MissingElement { element: String, parent: String },

    /// An axis declares both a resolution and coefficients, or neither.
    #[error("axis '{axis}' must declare exactly one of a resolution or a coefficient list")]
    AmbiguousSampling { axis: String },

    /// The server has no description for the requested coverage.
    #[error("coverage '{0}' is not known to the server")]
    UnknownCoverage(String),

    /// A single-coverage request returned several descriptions.
    #[error("expected one description of coverage '{name}', got {count}")]
    AmbiguousResponse { name: String, count: usize },

    /// A value in the document is present but unusable.
    #[error("invalid {what}: '{value}'")]
    InvalidValue { what: String, value: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{0}")]
    Config(String),
}

impl WcsError {
    pub(crate) fn missing(element: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
            parent: parent.into(),
        }
    }

    pub(crate) fn invalid(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            what: what.into(),
            value: value.into(),
        }
    }

    pub(crate) fn malformed_crs(crs: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCrs {
            crs: crs.into(),
            reason: reason.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// One `ows:Exception` entry of an OWS `ExceptionReport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OwsException {
    pub(crate) code: Option<String>,
    pub(crate) text: String,
}

/// Extracts the exceptions of an `ExceptionReport` document.
///
/// Returns `None` if `root` is not an exception report.
pub(crate) fn parse_exception_report(root: &Element) -> Option<Vec<OwsException>> {
    if root.name() != "ExceptionReport" {
        return None;
    }

    let exceptions = root
        .descendants("Exception")
        .map(|ex| OwsException {
            code: ex.attr("exceptionCode").map(str::to_string),
            text: ex
                .descendants("ExceptionText")
                .map(Element::text)
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect();
    Some(exceptions)
}

/// Renders exceptions as `code: text` lines.
pub(crate) fn format_exceptions(exceptions: &[OwsException]) -> String {
    exceptions
        .iter()
        .map(|ex| match &ex.code {
            Some(code) if ex.text.is_empty() => code.clone(),
            Some(code) => format!("{}: {}", code, ex.text),
            None => ex.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ows:ExceptionReport version="2.0.0" xmlns:ows="http://www.opengis.net/ows/2.0">
  <ows:Exception exceptionCode="NoSuchCoverage" locator="Foo">
    <ows:ExceptionText>Coverage does not exist.</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#;

    #[test]
    fn test_parse_exception_report() {
        let root = Element::parse(REPORT.as_bytes()).unwrap();
        let exceptions = parse_exception_report(&root).unwrap();
        assert_eq!(
            exceptions,
            vec![OwsException {
                code: Some("NoSuchCoverage".to_string()),
                text: "Coverage does not exist.".to_string(),
            }]
        );
        assert_eq!(
            format_exceptions(&exceptions),
            "NoSuchCoverage: Coverage does not exist."
        );
    }

    #[test]
    fn test_not_an_exception_report() {
        let root = Element::parse(b"<Capabilities/>").unwrap();
        assert!(parse_exception_report(&root).is_none());
    }

    #[test]
    fn test_transport_error_display() {
        let err = WcsError::Transport {
            url: "http://localhost/ows".to_string(),
            status: Some(404),
            message: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to http://localhost/ows failed (HTTP 404): not found"
        );

        let err = WcsError::Transport {
            url: "http://localhost/ows".to_string(),
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to http://localhost/ows failed: connection refused"
        );
    }
}
