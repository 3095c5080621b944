use std::collections::BTreeMap;
use tracing::debug;

use super::parse_corners;
use crate::crs::Crs;
use crate::error::{Result, WcsError};
use crate::model::{Axis, BasicCoverage, BoundingBox};
use crate::xml::Element;

const SIZE_IN_BYTES: &str = "sizeInBytes";
const AXIS_LIST: &str = "axisList";
const WGS84_CRS: &str = "EPSG:4326";

/// Reads every `CoverageSummary` of a GetCapabilities document, keyed by
/// coverage name.
pub fn parse_capabilities(root: &Element) -> Result<BTreeMap<String, BasicCoverage>> {
    let contents = root.require_child("Contents")?;
    let mut coverages = BTreeMap::new();
    for summary in contents.children_named("CoverageSummary") {
        let coverage = parse_coverage_summary(summary)?;
        coverages.insert(coverage.name().to_string(), coverage);
    }
    Ok(coverages)
}

fn parse_coverage_summary(summary: &Element) -> Result<BasicCoverage> {
    let name = summary
        .child("CoverageId")
        .or_else(|| summary.child("Identifier"))
        .ok_or_else(|| WcsError::missing("CoverageId", summary.name()))?
        .text();

    let mut params = match summary.child("AdditionalParameters") {
        Some(element) => parse_additional_parameters(element)?,
        None => BTreeMap::new(),
    };
    let size_bytes = params
        .remove(SIZE_IN_BYTES)
        .and_then(|value| match value.trim().parse::<u64>() {
            Ok(size) => Some(size),
            Err(_) => {
                debug!(coverage = name, value = %value, "ignoring non-numeric sizeInBytes");
                None
            }
        });
    let axis_names = params
        .remove(AXIS_LIST)
        .map(|value| value.split(',').map(|s| s.trim().to_string()).collect::<Vec<_>>());

    let native = summary.require_child("BoundingBox")?;
    let native_bbox = parse_native_bbox(native, axis_names)?;

    let mut coverage = BasicCoverage::new(name, native_bbox).with_extra_params(params);
    if let Some(subtype) = summary.child("CoverageSubtype") {
        coverage = coverage.with_subtype(subtype.text());
    }
    if let Some(wgs84) = summary.child("WGS84BoundingBox") {
        coverage = coverage.with_wgs84_bbox(parse_wgs84_bbox(wgs84)?);
    }
    if let Some(size) = size_bytes {
        coverage = coverage.with_size_bytes(size);
    }
    Ok(coverage)
}

/// The native bounding box; axes are named after `axisList` if given, else
/// `axis0`, `axis1`, ...
fn parse_native_bbox(element: &Element, axis_names: Option<Vec<String>>) -> Result<BoundingBox> {
    let crs = Crs::parse(element.require_attr("crs")?)?;
    let bounds = parse_corners(element)?;
    let names = match axis_names {
        Some(names) if names.len() == bounds.len() => names,
        Some(names) => {
            return Err(WcsError::invalid(
                AXIS_LIST,
                format!("{} names for {} axes", names.len(), bounds.len()),
            ));
        }
        None => (0..bounds.len()).map(|i| format!("axis{i}")).collect(),
    };
    let axes = names
        .into_iter()
        .zip(bounds)
        .map(|(name, (low, high))| Axis::new(name, low, high))
        .collect::<Result<Vec<_>>>()?;
    BoundingBox::geo(crs, axes)
}

fn parse_wgs84_bbox(element: &Element) -> Result<BoundingBox> {
    let bounds = parse_corners(element)?;
    let [(lon_low, lon_high), (lat_low, lat_high)]: [_; 2] =
        bounds.try_into().map_err(|b: Vec<_>| {
            WcsError::invalid("WGS84BoundingBox", format!("{} bounds, expected 2", b.len()))
        })?;
    BoundingBox::geo(
        Crs::parse(WGS84_CRS)?,
        vec![
            Axis::new("Lon", lon_low, lon_high)?,
            Axis::new("Lat", lat_low, lat_high)?,
        ],
    )
}

fn parse_additional_parameters(element: &Element) -> Result<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for param in element.children_named("AdditionalParameter") {
        let name = param.require_child("Name")?.text();
        let value = param.require_child("Value")?.text();
        params.insert(name.to_string(), value.to_string());
    }
    Ok(params)
}
