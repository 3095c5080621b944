use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::model::bbox::BoundingBox;
use crate::model::metadata::Node;
use crate::model::range_type::RangeType;

/// A coverage as summarized in a GetCapabilities document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicCoverage {
    name: String,
    subtype: Option<String>,
    native_bbox: BoundingBox,
    wgs84_bbox: Option<BoundingBox>,
    size_bytes: Option<u64>,
    extra_params: BTreeMap<String, String>,
}

impl BasicCoverage {
    pub fn new(name: impl Into<String>, native_bbox: BoundingBox) -> BasicCoverage {
        BasicCoverage {
            name: name.into(),
            subtype: None,
            native_bbox,
            wgs84_bbox: None,
            size_bytes: None,
            extra_params: BTreeMap::new(),
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_wgs84_bbox(mut self, bbox: BoundingBox) -> Self {
        self.wgs84_bbox = Some(bbox);
        self
    }

    pub fn with_size_bytes(mut self, size: u64) -> Self {
        self.size_bytes = Some(size);
        self
    }

    pub fn with_extra_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.extra_params = params;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coverage subtype, e.g. `ReferenceableGridCoverage`.
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    pub fn native_bbox(&self) -> &BoundingBox {
        &self.native_bbox
    }

    /// Longitude/latitude extent, when the server reports one.
    ///
    /// Servers omit `WGS84BoundingBox` for coverages whose CRS is not
    /// geographic (pure index grids, say), so this may be `None` even though
    /// WCS 2.0 lists the element for every summary.
    pub fn wgs84_bbox(&self) -> Option<&BoundingBox> {
        self.wgs84_bbox.as_ref()
    }

    pub fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    /// Server specific key/value parameters not otherwise modeled.
    pub fn extra_params(&self) -> &BTreeMap<String, String> {
        &self.extra_params
    }
}

impl fmt::Display for BasicCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if let Some(subtype) = &self.subtype {
            write!(f, "\n  subtype: {}", subtype)?;
        }
        write!(f, "\n{}", self.native_bbox)?;
        if let Some(wgs84) = &self.wgs84_bbox {
            write!(f, "\n  lon/lat bbox:")?;
            wgs84.write_axes(f)?;
        }
        if let Some(size) = self.size_bytes {
            write!(f, "\n  size in bytes: {}", size)?;
        }
        if !self.extra_params.is_empty() {
            write!(f, "\n  additional params:")?;
            for (key, value) in &self.extra_params {
                write!(f, "\n    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// A coverage as described by DescribeCoverage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullCoverage {
    name: String,
    native_bbox: BoundingBox,
    grid_bbox: BoundingBox,
    range_type: RangeType,
    metadata: Node,
}

impl FullCoverage {
    pub fn new(
        name: impl Into<String>,
        native_bbox: BoundingBox,
        grid_bbox: BoundingBox,
        range_type: RangeType,
    ) -> FullCoverage {
        FullCoverage {
            name: name.into(),
            native_bbox,
            grid_bbox,
            range_type,
            metadata: Node::Map(Vec::new()),
        }
    }

    /// Replaces the metadata; anything but a map is ignored.
    pub fn with_metadata(mut self, metadata: Node) -> Self {
        if let Node::Map(_) = metadata {
            self.metadata = metadata;
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native_bbox(&self) -> &BoundingBox {
        &self.native_bbox
    }

    pub fn grid_bbox(&self) -> &BoundingBox {
        &self.grid_bbox
    }

    pub fn range_type(&self) -> &RangeType {
        &self.range_type
    }

    /// Free-form metadata; always a [`Node::Map`], possibly empty.
    pub fn metadata(&self) -> &Node {
        &self.metadata
    }
}

impl fmt::Display for FullCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        write!(f, "\n{}", self.native_bbox)?;
        write!(f, "\n{}", self.grid_bbox)?;
        write!(f, "\n{}", self.range_type)?;
        if !self.metadata.is_empty() {
            let json = serde_json::to_string_pretty(&self.metadata).map_err(|_| fmt::Error)?;
            write!(f, "\n  metadata:")?;
            for line in json.lines() {
                write!(f, "\n    {}", line)?;
            }
        }
        Ok(())
    }
}
