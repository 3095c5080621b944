use serde::Serialize;
use std::fmt;
use std::ops::Index;

use crate::crs::Crs;
use crate::error::{Result, WcsError};
use crate::model::axis::Axis;

/// An ordered set of axes with their bounds.
///
/// Geo (native) boxes carry the compound [`Crs`] of their axes, one component
/// per axis in box order; grid boxes have no CRS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    crs: Option<Crs>,
    axes: Vec<Axis>,
}

impl BoundingBox {
    /// A box in the given CRS; each axis is assigned its CRS component.
    pub fn geo(crs: Crs, axes: Vec<Axis>) -> Result<BoundingBox> {
        let components = crs.components_for_axes(axes.len())?;
        let axes = axes
            .into_iter()
            .zip(components)
            .map(|(axis, component)| axis.with_crs_component(Some(component)))
            .collect();
        BoundingBox::build(Some(crs), axes)
    }

    /// A box in grid (pixel index) space.
    pub fn grid(axes: Vec<Axis>) -> Result<BoundingBox> {
        let axes = axes
            .into_iter()
            .map(|axis| axis.with_crs_component(None))
            .collect();
        BoundingBox::build(None, axes)
    }

    fn build(crs: Option<Crs>, axes: Vec<Axis>) -> Result<BoundingBox> {
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|other| other.name() == axis.name()) {
                return Err(WcsError::invalid("duplicate axis name", axis.name()));
            }
        }
        Ok(BoundingBox { crs, axes })
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Axis> {
        self.axes.iter()
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn axis_names(&self) -> Vec<&str> {
        self.axes.iter().map(Axis::name).collect()
    }

    /// Axis at a zero-based position.
    pub fn get(&self, index: usize) -> Option<&Axis> {
        self.axes.get(index)
    }

    /// Axis by name.
    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.name() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.name() == name)
    }

    /// Axis by name, or by position if `key` is not a name but a decimal index.
    pub fn lookup(&self, key: &str) -> Option<&Axis> {
        self.axis(key)
            .or_else(|| key.parse::<usize>().ok().and_then(|i| self.get(i)))
    }

    pub(crate) fn write_axes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in &self.axes {
            write!(f, "\n{}", axis)?;
        }
        Ok(())
    }
}

impl Index<usize> for BoundingBox {
    type Output = Axis;

    fn index(&self, index: usize) -> &Axis {
        &self.axes[index]
    }
}

impl Index<&str> for BoundingBox {
    type Output = Axis;

    /// Panics if there is no axis called `name`.
    fn index(&self, name: &str) -> &Axis {
        self.axis(name)
            .unwrap_or_else(|| panic!("no axis named '{}'", name))
    }
}

impl<'a> IntoIterator for &'a BoundingBox {
    type Item = &'a Axis;
    type IntoIter = std::slice::Iter<'a, Axis>;

    fn into_iter(self) -> Self::IntoIter {
        self.axes.iter()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.crs {
            Some(crs) => write!(f, "  native CRS: {}\n  geo bbox:", crs)?,
            None => write!(f, "  grid bbox:")?,
        }
        self.write_axes(f)
    }
}
