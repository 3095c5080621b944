use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use wcs_client::{Scalar, ServiceConfig, WebCoverageService, load_config};

fn main() -> Result<()> {
    // Set RUST_LOG=wcs_client=debug to see the requests.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Configure the endpoint via WCS_ENDPOINT or a `.wcsrc` file; falls back
    // to the public rasdaman demo server.
    let config = load_config(None, None, None)
        .unwrap_or_else(|_| ServiceConfig::new("https://ows.rasdaman.org/rasdaman/ows"));
    let service = WebCoverageService::new(config)?;

    let coverages = service.list_coverages()?;
    println!("{} coverages", coverages.len());
    if let Some(summary) = coverages.get("AvgLandTemp") {
        println!("{summary}");
    }

    let coverage = service
        .list_full_info("AvgLandTemp")
        .context("failed to describe AvgLandTemp")?;
    println!("{coverage}");

    let ansi = &coverage.native_bbox()["ansi"];
    let year_2006 = ansi.coefficients_between(
        &Scalar::parse("\"2006-01-01\"")?,
        &Scalar::parse("\"2006-12-31\"")?,
    );
    println!("{} time slices in 2006", year_2006.len());
    Ok(())
}
