//! Coordinate reference system identifiers.
//!
//! WCS servers identify CRSs with OGC definition URIs such as
//! `https://www.opengis.net/def/crs/EPSG/0/4326`. A coverage with a time axis
//! and two spatial axes uses a compound URI listing its components in order:
//!
//! ```text
//! https://www.opengis.net/def/crs-compound?1=https://www.opengis.net/def/crs/OGC/0/AnsiDate&2=https://www.opengis.net/def/crs/EPSG/0/4326
//! ```
//!
//! The shorthand notation of the same CRS is `OGC:AnsiDate+EPSG:4326`.
//! Everything here is lexical: authorities and codes are read from the URI
//! path, never checked against a registry.

use serde::Serialize;
use std::fmt;

use crate::error::{Result, WcsError};

/// Base of the CRS definition URIs built from shorthand notation.
pub const CRS_BASE_URL: &str = "https://www.opengis.net/def/crs";
/// Base of compound CRS URIs.
pub const COMPOUND_CRS_BASE_URL: &str = "https://www.opengis.net/def/crs-compound";

const DEFAULT_VERSION: &str = "0";

/// One component of a (possibly compound) CRS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CrsComponent {
    uri: String,
    authority: String,
    version: String,
    code: String,
}

impl CrsComponent {
    /// Parses a single CRS reference: a definition URL, an `AUTH/VERSION/CODE`
    /// path, or an `AUTH:CODE` / `AUTH:VERSION:CODE` shorthand.
    pub fn parse(reference: &str) -> Result<CrsComponent> {
        let reference: String = reference.split_whitespace().collect();
        if reference.is_empty() {
            return Err(WcsError::malformed_crs(reference, "empty CRS reference"));
        }

        let (authority, version, code) = split_reference(&reference).ok_or_else(|| {
            WcsError::malformed_crs(
                &reference,
                "expected .../crs/AUTHORITY/VERSION/CODE, AUTHORITY/VERSION/CODE or AUTHORITY:CODE",
            )
        })?;

        if authority.is_empty() || version.is_empty() || code.is_empty() {
            return Err(WcsError::malformed_crs(
                &reference,
                "authority, version and code must not be empty",
            ));
        }

        let uri = if reference.contains("://") {
            reference
        } else {
            format!("{}/{}/{}/{}", CRS_BASE_URL, authority, version, code)
        };

        Ok(CrsComponent {
            uri,
            authority,
            version,
            code,
        })
    }

    /// Full definition URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// `AUTH:CODE`, or `AUTH:VERSION:CODE` when the version is not `0`.
    pub fn to_short_notation(&self) -> String {
        if self.version == DEFAULT_VERSION {
            format!("{}:{}", self.authority, self.code)
        } else {
            format!("{}:{}:{}", self.authority, self.version, self.code)
        }
    }

    /// Number of coverage axes this component spans.
    ///
    /// EPSG components are taken as two-dimensional (lat/lon, or
    /// easting/northing). OGC index CRSs carry their dimension in the code
    /// (`Index2D` spans two axes). Every other component spans one axis.
    pub fn axis_count(&self) -> usize {
        if self.authority.eq_ignore_ascii_case("EPSG") {
            return 2;
        }
        self.code
            .strip_prefix("Index")
            .and_then(|rest| rest.strip_suffix('D'))
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1)
    }
}

impl fmt::Display for CrsComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_short_notation())
    }
}

/// Splits a CRS reference into authority, version and code.
fn split_reference(reference: &str) -> Option<(String, String, String)> {
    if reference.contains("://") {
        let url = url::Url::parse(reference).ok()?;
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [.., "crs", authority, version, code] => owned(authority, version, code),
            _ => None,
        }
    } else if reference.contains('/') {
        match reference.split('/').collect::<Vec<_>>().as_slice() {
            [authority, version, code] => owned(authority, version, code),
            _ => None,
        }
    } else {
        match reference.split(':').collect::<Vec<_>>().as_slice() {
            [authority, code] => owned(authority, DEFAULT_VERSION, code),
            [authority, version, code] => owned(authority, version, code),
            _ => None,
        }
    }
}

fn owned(authority: &str, version: &str, code: &str) -> Option<(String, String, String)> {
    Some((authority.to_string(), version.to_string(), code.to_string()))
}

/// A CRS made of one or more ordered components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Crs {
    components: Vec<CrsComponent>,
}

impl Crs {
    /// Parses a single or compound CRS URI.
    ///
    /// Compound URIs must number their components `1=`, `2=`, ... without gaps.
    pub fn parse(uri: &str) -> Result<Crs> {
        let uri: String = uri.split_whitespace().collect();
        if !uri.contains("crs-compound") {
            return Ok(Crs {
                components: vec![CrsComponent::parse(&uri)?],
            });
        }

        let url =
            url::Url::parse(&uri).map_err(|e| WcsError::malformed_crs(&uri, e.to_string()))?;

        let mut indexed: Vec<(usize, String)> = Vec::new();
        for (key, value) in url.query_pairs() {
            let index: usize = key.parse().map_err(|_| {
                WcsError::malformed_crs(&uri, format!("component key '{}' is not an index", key))
            })?;
            indexed.push((index, value.into_owned()));
        }
        if indexed.is_empty() {
            return Err(WcsError::malformed_crs(&uri, "compound CRS has no components"));
        }

        indexed.sort_by_key(|(index, _)| *index);
        for (expected, (index, _)) in (1..).zip(&indexed) {
            if *index != expected {
                return Err(WcsError::malformed_crs(
                    &uri,
                    format!("component indices must be 1..={}", indexed.len()),
                ));
            }
        }

        let components = indexed
            .iter()
            .map(|(_, reference)| CrsComponent::parse(reference))
            .collect::<Result<Vec<_>>>()?;
        Ok(Crs { components })
    }

    /// Builds a CRS from its shorthand notation, e.g. `OGC:AnsiDate+EPSG:4326`.
    ///
    /// `component_count` is the number of components the caller expects; a
    /// shorthand with a different number is rejected.
    pub fn to_long_notation(short: &str, component_count: usize) -> Result<Crs> {
        let parts: Vec<&str> = short.split('+').map(str::trim).collect();
        if parts.len() != component_count {
            return Err(WcsError::malformed_crs(
                short,
                format!(
                    "expected {} component(s), found {}",
                    component_count,
                    parts.len()
                ),
            ));
        }
        if parts.iter().any(|p| p.contains('/')) {
            return Err(WcsError::malformed_crs(
                short,
                "shorthand components are AUTHORITY:CODE",
            ));
        }

        let components = parts
            .into_iter()
            .map(CrsComponent::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Crs { components })
    }

    /// Components joined by `+` in declaration order.
    pub fn to_short_notation(&self) -> String {
        self.components
            .iter()
            .map(CrsComponent::to_short_notation)
            .collect::<Vec<_>>()
            .join("+")
    }

    /// The single component URI, or a compound URI for several components.
    pub fn uri(&self) -> String {
        match self.components.as_slice() {
            [single] => single.uri.clone(),
            components => {
                let query = components
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("{}={}", i + 1, c.uri))
                    .collect::<Vec<_>>()
                    .join("&");
                format!("{}?{}", COMPOUND_CRS_BASE_URL, query)
            }
        }
    }

    pub fn components(&self) -> &[CrsComponent] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&CrsComponent> {
        self.components.get(index)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn is_compound(&self) -> bool {
        self.components.len() > 1
    }

    /// Total number of axes spanned by all components.
    pub fn axis_count(&self) -> usize {
        self.components.iter().map(CrsComponent::axis_count).sum()
    }

    /// Assigns a component to each of `axis_count` axes, in order.
    ///
    /// Components are expanded by their [`CrsComponent::axis_count`]. If that
    /// does not add up but there is exactly one component per axis, the
    /// components are assigned one to one. Otherwise the expansion is cut at
    /// `axis_count`, or padded with the last component. Only a CRS with more
    /// components than axes is rejected.
    pub fn components_for_axes(&self, axis_count: usize) -> Result<Vec<CrsComponent>> {
        if self.components.len() > axis_count {
            return Err(WcsError::malformed_crs(
                self.uri(),
                format!(
                    "{} component(s) cannot be assigned to {} axes",
                    self.components.len(),
                    axis_count
                ),
            ));
        }
        if self.axis_count() != axis_count && self.components.len() == axis_count {
            return Ok(self.components.clone());
        }

        let mut per_axis: Vec<CrsComponent> = self
            .components
            .iter()
            .flat_map(|c| std::iter::repeat_n(c.clone(), c.axis_count()))
            .take(axis_count)
            .collect();
        if let Some(last) = per_axis.last().cloned() {
            per_axis.resize(axis_count, last);
        }
        Ok(per_axis)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_short_notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSI_4326: &str = "https://www.opengis.net/def/crs-compound?1=https://www.opengis.net/def/crs/OGC/0/AnsiDate&2=https://www.opengis.net/def/crs/EPSG/0/4326";

    #[test]
    fn test_parse_single_url() {
        let crs = Crs::parse("http://localhost:8080/rasdaman/def/crs/EPSG/0/4326").unwrap();
        assert_eq!(crs.len(), 1);
        assert_eq!(crs.to_short_notation(), "EPSG:4326");
        assert_eq!(
            crs.uri(),
            "http://localhost:8080/rasdaman/def/crs/EPSG/0/4326"
        );
    }

    #[test]
    fn test_parse_versioned_url() {
        let crs = Crs::parse("http://localhost:8080/rasdaman/def/crs/EPSG/1/4326").unwrap();
        assert_eq!(crs.to_short_notation(), "EPSG:1:4326");
        assert_eq!(crs.component(0).unwrap().version(), "1");
    }

    #[test]
    fn test_parse_path_and_short_forms() {
        assert_eq!(Crs::parse("EPSG/0/4326").unwrap().to_short_notation(), "EPSG:4326");
        assert_eq!(Crs::parse("EPSG:4326").unwrap().to_short_notation(), "EPSG:4326");
        assert_eq!(Crs::parse("EPSG:1:4326").unwrap().to_short_notation(), "EPSG:1:4326");
        assert_eq!(
            Crs::parse("EPSG:4326").unwrap().uri(),
            "https://www.opengis.net/def/crs/EPSG/0/4326"
        );
    }

    #[test]
    fn test_parse_compound() {
        let crs = Crs::parse(ANSI_4326).unwrap();
        assert!(crs.is_compound());
        assert_eq!(crs.to_short_notation(), "OGC:AnsiDate+EPSG:4326");
        assert_eq!(crs.component(0).unwrap().authority(), "OGC");
        assert_eq!(crs.component(1).unwrap().code(), "4326");
        assert_eq!(crs.uri(), ANSI_4326);
    }

    #[test]
    fn test_parse_compound_with_whitespace() {
        let pretty = "https://www.opengis.net/def/crs-compound?
            1=https://www.opengis.net/def/crs/OGC/0/AnsiDate&
            2=https://www.opengis.net/def/crs/EPSG/0/4326";
        assert_eq!(Crs::parse(pretty).unwrap(), Crs::parse(ANSI_4326).unwrap());
    }

    #[test]
    fn test_parse_compound_out_of_order_keys() {
        let uri = "https://www.opengis.net/def/crs-compound?2=https://www.opengis.net/def/crs/EPSG/0/3857&1=https://www.opengis.net/def/crs/EPSG/0/4326";
        assert_eq!(
            Crs::parse(uri).unwrap().to_short_notation(),
            "EPSG:4326+EPSG:3857"
        );
    }

    #[test]
    fn test_parse_compound_gap_in_indices() {
        let uri = "https://www.opengis.net/def/crs-compound?1=https://www.opengis.net/def/crs/OGC/0/AnsiDate&3=https://www.opengis.net/def/crs/EPSG/0/4326";
        assert!(matches!(Crs::parse(uri), Err(WcsError::MalformedCrs { .. })));
    }

    #[test]
    fn test_parse_compound_duplicate_index() {
        let uri = "https://www.opengis.net/def/crs-compound?1=https://www.opengis.net/def/crs/OGC/0/AnsiDate&1=https://www.opengis.net/def/crs/EPSG/0/4326";
        assert!(matches!(Crs::parse(uri), Err(WcsError::MalformedCrs { .. })));
    }

    #[test]
    fn test_parse_compound_bad_key() {
        let uri = "https://www.opengis.net/def/crs-compound?a=https://www.opengis.net/def/crs/EPSG/0/4326";
        assert!(matches!(Crs::parse(uri), Err(WcsError::MalformedCrs { .. })));
    }

    #[test]
    fn test_parse_unrecognized() {
        assert!(matches!(
            Crs::parse("http://example.com/unknown"),
            Err(WcsError::MalformedCrs { .. })
        ));
        assert!(matches!(
            Crs::parse("http://example.com/invalid/crs"),
            Err(WcsError::MalformedCrs { .. })
        ));
        assert!(matches!(Crs::parse("4326"), Err(WcsError::MalformedCrs { .. })));
        assert!(matches!(Crs::parse(""), Err(WcsError::MalformedCrs { .. })));
    }

    #[test]
    fn test_to_long_notation() {
        let crs = Crs::to_long_notation("OGC:AnsiDate+EPSG:4326", 2).unwrap();
        assert_eq!(crs.uri(), ANSI_4326);
        assert!(matches!(
            Crs::to_long_notation("OGC:AnsiDate+EPSG:4326", 3),
            Err(WcsError::MalformedCrs { .. })
        ));
        assert!(matches!(
            Crs::to_long_notation("EPSG", 1),
            Err(WcsError::MalformedCrs { .. })
        ));
    }

    #[test]
    fn test_short_long_round_trip() {
        for short in [
            "EPSG:4326",
            "EPSG:1:4326",
            "OGC:AnsiDate+EPSG:4326",
            "EPSG:4326+EPSG:3857",
            "OGC:1.3:CRS84",
            "OGC:AnsiDate+OGC:Index2D+EPSG:32633",
        ] {
            let n = short.split('+').count();
            let long = Crs::to_long_notation(short, n).unwrap();
            let reparsed = Crs::parse(&long.uri()).unwrap();
            assert_eq!(reparsed.to_short_notation(), short);
            assert_eq!(reparsed, long);
        }
    }

    #[test]
    fn test_components_for_axes() {
        let crs = Crs::parse(ANSI_4326).unwrap();
        assert_eq!(crs.axis_count(), 3);
        let per_axis = crs.components_for_axes(3).unwrap();
        let short: Vec<_> = per_axis.iter().map(|c| c.to_short_notation()).collect();
        assert_eq!(short, vec!["OGC:AnsiDate", "EPSG:4326", "EPSG:4326"]);

        // two 2D components on a 2D box are taken one per axis
        let crs = Crs::to_long_notation("EPSG:4326+EPSG:3857", 2).unwrap();
        let per_axis = crs.components_for_axes(2).unwrap();
        assert_eq!(per_axis[1].code(), "3857");

        assert!(matches!(
            Crs::parse(ANSI_4326).unwrap().components_for_axes(1),
            Err(WcsError::MalformedCrs { .. })
        ));
    }

    #[test]
    fn test_index_components_span_their_dimension() {
        let crs = Crs::parse("https://www.opengis.net/def/crs/OGC/0/Index2D").unwrap();
        assert_eq!(crs.axis_count(), 2);
        let per_axis = crs.components_for_axes(2).unwrap();
        assert_eq!(per_axis.len(), 2);
        assert!(per_axis.iter().all(|c| c.code() == "Index2D"));

        assert_eq!(Crs::parse("OGC:Index3D").unwrap().axis_count(), 3);
        assert_eq!(Crs::parse("OGC:AnsiDate").unwrap().axis_count(), 1);
        assert_eq!(Crs::parse("OGC:IndexND").unwrap().axis_count(), 1);

        let crs = Crs::to_long_notation("OGC:AnsiDate+OGC:Index2D", 2).unwrap();
        let short: Vec<_> = crs
            .components_for_axes(3)
            .unwrap()
            .iter()
            .map(|c| c.to_short_notation())
            .collect();
        assert_eq!(short, vec!["OGC:AnsiDate", "OGC:Index2D", "OGC:Index2D"]);
    }

    #[test]
    fn test_components_padded_or_cut_to_axes() {
        // one 1D component on three axes: the last component is repeated
        let crs = Crs::parse("OGC:AnsiDate").unwrap();
        let per_axis = crs.components_for_axes(3).unwrap();
        assert_eq!(per_axis.len(), 3);
        assert!(per_axis.iter().all(|c| c.code() == "AnsiDate"));

        let per_axis = Crs::parse(ANSI_4326).unwrap().components_for_axes(5).unwrap();
        let codes: Vec<_> = per_axis.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec!["AnsiDate", "4326", "4326", "4326", "4326"]);

        let crs = Crs::to_long_notation("OGC:AnsiDate+OGC:Index2D+EPSG:32633", 3).unwrap();
        let per_axis = crs.components_for_axes(4).unwrap();
        let codes: Vec<_> = per_axis.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec!["AnsiDate", "Index2D", "Index2D", "32633"]);
    }
}
