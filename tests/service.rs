mod common;

use common::{CannedTransport, ENDPOINT, fixture, fixture_text};
use wcs_client::{HttpResponse, Result, Scalar, Transport, WcsError, WebCoverageService};

fn service_answering(response: HttpResponse) -> WebCoverageService {
    let (transport, _) = CannedTransport::new(response);
    WebCoverageService::with_transport(ENDPOINT, transport)
}

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn list_coverages_sends_get_capabilities() {
    let (transport, requests) = CannedTransport::new(HttpResponse::ok(fixture("capabilities.xml")));
    let service = WebCoverageService::with_transport(ENDPOINT, transport);

    let coverages = service.list_coverages().unwrap();
    assert_eq!(coverages.len(), 2);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, ENDPOINT);
    assert_eq!(
        requests[0].1,
        params(&[("service", "WCS"), ("request", "GetCapabilities")])
    );
}

#[test]
fn list_coverages_avg_land_temp() {
    let service = service_answering(HttpResponse::ok(fixture("capabilities.xml")));
    let coverages = service.list_coverages().unwrap();
    let coverage = &coverages["AvgLandTemp"];

    let native = coverage.native_bbox();
    assert_eq!(
        native.crs().unwrap().to_short_notation(),
        "OGC:AnsiDate+EPSG:4326"
    );
    assert_eq!(native[0].name(), "ansi");
    assert_eq!(
        native["ansi"].crs_component().unwrap().uri(),
        "https://www.opengis.net/def/crs/OGC/0/AnsiDate"
    );
    assert_eq!(coverage.size_bytes(), Some(4809618404));
    assert!(coverage.extra_params().is_empty());
    assert_eq!(
        coverage.to_string(),
        fixture_text("capabilities_avg_land_temp.txt").trim_end()
    );
}

#[test]
fn list_coverages_keeps_unknown_parameters() {
    let service = service_answering(HttpResponse::ok(fixture("capabilities.xml")));
    let coverages = service.list_coverages().unwrap();
    let coverage = &coverages["mean_summer_airtemp"];
    assert_eq!(coverage.native_bbox().axis_names(), vec!["Lat", "Lon"]);
    assert_eq!(*coverage.native_bbox()["Lat"].lower_bound(), Scalar::Float(-44.525));
    assert_eq!(coverage.extra_params()["blackListed"], "false");
    assert!(coverage.size_bytes().is_none());
}

#[test]
fn list_full_info_sends_describe_coverage() {
    let (transport, requests) =
        CannedTransport::new(HttpResponse::ok(fixture("describe_avg_land_temp.xml")));
    let service = WebCoverageService::with_transport(ENDPOINT, transport);

    service.list_full_info("AvgLandTemp").unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(
        requests[0].1,
        params(&[
            ("service", "WCS"),
            ("version", "2.1.0"),
            ("request", "DescribeCoverage"),
            ("outputType", "GeneralGridCoverage"),
            ("coverageId", "AvgLandTemp"),
        ])
    );
}

#[test]
fn list_full_info_avg_land_temp() {
    let service = service_answering(HttpResponse::ok(fixture("describe_avg_land_temp.xml")));
    let coverage = service.list_full_info("AvgLandTemp").unwrap();

    let native = coverage.native_bbox();
    assert_eq!(native.axis_names(), vec!["ansi", "Lat", "Lon"]);
    assert_eq!(native["Lat"].resolution(), Some(-0.1));
    assert_eq!(native.lookup("2").unwrap().resolution(), Some(0.1));

    let ansi = &native["ansi"];
    let coefficients = ansi.coefficients().unwrap();
    assert_eq!(coefficients.len(), 185);
    assert_eq!(coefficients[0], *ansi.lower_bound());
    assert_eq!(coefficients[coefficients.len() - 1], *ansi.upper_bound());

    let subset = ansi.coefficients_between(
        &Scalar::parse("\"2006-08-01\"").unwrap(),
        &Scalar::parse("\"2007-01-01\"").unwrap(),
    );
    assert_eq!(subset.len(), 6);

    let gray = &coverage.range_type()["Gray"];
    assert!(gray.is_quantity());
    assert_eq!(gray.nil_values().len(), 1);
    assert_eq!(gray.nil_values()[0].value, Scalar::Int(99999));

    assert_eq!(
        coverage.to_string(),
        fixture_text("describe_avg_land_temp.txt").trim_end()
    );
}

#[test]
fn list_full_info_without_descriptions_is_unknown() {
    let service = service_answering(HttpResponse::ok(fixture("describe_empty.xml")));
    assert!(matches!(
        service.list_full_info("AvgLandTemp"),
        Err(WcsError::UnknownCoverage(ref name)) if name == "AvgLandTemp"
    ));
}

#[test]
fn list_full_info_with_two_descriptions_is_ambiguous() {
    let service = service_answering(HttpResponse::ok(fixture("describe_two.xml")));
    assert!(matches!(
        service.list_full_info("AvgLandTemp"),
        Err(WcsError::AmbiguousResponse { count: 2, .. })
    ));
}

#[test]
fn no_such_coverage_report_is_unknown() {
    let service = service_answering(HttpResponse {
        status: 404,
        body: fixture("exception_no_such_coverage.xml"),
    });
    assert!(matches!(
        service.list_full_info("Foo"),
        Err(WcsError::UnknownCoverage(ref name)) if name == "Foo"
    ));
}

#[test]
fn exception_report_on_capabilities_is_transport_error() {
    let service = service_answering(HttpResponse {
        status: 404,
        body: fixture("exception_no_such_coverage.xml"),
    });
    match service.list_coverages() {
        Err(WcsError::Transport { url, status, message }) => {
            assert_eq!(url, ENDPOINT);
            assert_eq!(status, Some(404));
            assert!(message.starts_with("NoSuchCoverage: One of the identifiers"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn non_xml_error_body_is_kept() {
    let service = service_answering(HttpResponse {
        status: 503,
        body: b"Service Unavailable\n".to_vec(),
    });
    match service.list_coverages() {
        Err(WcsError::Transport { status, message, .. }) => {
            assert_eq!(status, Some(503));
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

struct Unreachable;

impl Transport for Unreachable {
    fn get(&self, url: &str, _params: &[(&str, &str)]) -> Result<HttpResponse> {
        Err(WcsError::Transport {
            url: url.to_string(),
            status: None,
            message: "connection refused".to_string(),
        })
    }
}

#[test]
fn transport_failure_is_propagated() {
    let service = WebCoverageService::with_transport(ENDPOINT, Unreachable);
    assert!(matches!(
        service.list_full_info("AvgLandTemp"),
        Err(WcsError::Transport { status: None, .. })
    ));
}
