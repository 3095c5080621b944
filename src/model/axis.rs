use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::crs::CrsComponent;
use crate::error::{Result, WcsError};
use crate::model::scalar::Scalar;

/// Width the coefficient list of an irregular axis is wrapped at when printed.
const COEFFICIENTS_WIDTH: usize = 120;

/// How an axis is sampled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Sampling {
    /// Evenly spaced points, `resolution` apart (negative for descending axes).
    Regular { resolution: Resolution },
    /// Explicitly listed points.
    Irregular { coefficients: Vec<Scalar> },
}

/// Spacing of a regular axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolution {
    Number(f64),
    /// A step that is not a number, such as the ISO 8601 duration `P1M`.
    Text(String),
}

impl Resolution {
    /// A number when the value parses as one, the trimmed text otherwise.
    pub fn parse(raw: &str) -> Resolution {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(value) => Resolution::Number(value),
            Err(_) => Resolution::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Resolution::Number(value) => Some(*value),
            Resolution::Text(_) => None,
        }
    }
}

impl From<f64> for Resolution {
    fn from(value: f64) -> Self {
        Resolution::Number(value)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Number(value) => write!(f, "{}", value),
            Resolution::Text(step) => f.write_str(step),
        }
    }
}

/// One axis of a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    name: String,
    lower_bound: Scalar,
    upper_bound: Scalar,
    crs_component: Option<CrsComponent>,
    unit_of_measure: Option<String>,
    sampling: Option<Sampling>,
}

impl Axis {
    /// An axis known only by its extent, as listed in GetCapabilities.
    pub fn new(name: impl Into<String>, lower_bound: Scalar, upper_bound: Scalar) -> Result<Axis> {
        let name = name.into();
        if lower_bound.partial_cmp(&upper_bound) == Some(Ordering::Greater) {
            return Err(WcsError::invalid(
                format!("bounds of axis '{}'", name),
                format!("{} > {}", lower_bound, upper_bound),
            ));
        }
        Ok(Axis {
            name,
            lower_bound,
            upper_bound,
            crs_component: None,
            unit_of_measure: None,
            sampling: None,
        })
    }

    /// A regularly sampled axis.
    pub fn regular(
        name: impl Into<String>,
        lower_bound: Scalar,
        upper_bound: Scalar,
        resolution: impl Into<Resolution>,
    ) -> Result<Axis> {
        let mut axis = Axis::new(name, lower_bound, upper_bound)?;
        axis.sampling = Some(Sampling::Regular {
            resolution: resolution.into(),
        });
        Ok(axis)
    }

    /// An irregularly sampled axis; its bounds are the first and last coefficient.
    pub fn irregular(name: impl Into<String>, coefficients: Vec<Scalar>) -> Result<Axis> {
        let name = name.into();
        let (Some(first), Some(last)) = (coefficients.first(), coefficients.last()) else {
            return Err(WcsError::invalid(
                format!("coefficients of axis '{}'", name),
                "",
            ));
        };
        let mut axis = Axis::new(name, first.clone(), last.clone())?;
        axis.sampling = Some(Sampling::Irregular { coefficients });
        Ok(axis)
    }

    pub fn with_unit_of_measure(mut self, uom: impl Into<String>) -> Self {
        self.unit_of_measure = Some(uom.into());
        self
    }

    pub(crate) fn with_crs_component(mut self, component: Option<CrsComponent>) -> Self {
        self.crs_component = component;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower_bound(&self) -> &Scalar {
        &self.lower_bound
    }

    pub fn upper_bound(&self) -> &Scalar {
        &self.upper_bound
    }

    /// The component of the bounding box CRS this axis belongs to; `None` for
    /// grid axes.
    pub fn crs_component(&self) -> Option<&CrsComponent> {
        self.crs_component.as_ref()
    }

    pub fn unit_of_measure(&self) -> Option<&str> {
        self.unit_of_measure.as_deref()
    }

    /// Sampling detail; `None` for axes read from GetCapabilities.
    pub fn sampling(&self) -> Option<&Sampling> {
        self.sampling.as_ref()
    }

    pub fn is_regular(&self) -> Option<bool> {
        self.sampling
            .as_ref()
            .map(|s| matches!(s, Sampling::Regular { .. }))
    }

    /// Numeric resolution of a regular axis; `None` for a non-numeric step.
    pub fn resolution(&self) -> Option<f64> {
        self.step().and_then(Resolution::as_f64)
    }

    /// Resolution of a regular axis as declared, numeric or not.
    pub fn step(&self) -> Option<&Resolution> {
        match &self.sampling {
            Some(Sampling::Regular { resolution }) => Some(resolution),
            _ => None,
        }
    }

    pub fn coefficients(&self) -> Option<&[Scalar]> {
        match &self.sampling {
            Some(Sampling::Irregular { coefficients }) => Some(coefficients),
            _ => None,
        }
    }

    /// Coefficients of an irregular axis within `[low, high]`.
    ///
    /// Values that cannot be compared with the coefficients (a number against
    /// a timestamp axis, say) select nothing.
    pub fn coefficients_between(&self, low: &Scalar, high: &Scalar) -> Vec<&Scalar> {
        self.coefficients()
            .unwrap_or_default()
            .iter()
            .filter(|c| *c >= low && *c <= high)
            .collect()
    }
}

/// Multi-line rendering, indented for nesting under a bounding box.
impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "      ";
        write!(f, "    {}:", self.name)?;
        write!(f, "\n{indent}min: {}", self.lower_bound)?;
        write!(f, "\n{indent}max: {}", self.upper_bound)?;
        if let Some(crs) = &self.crs_component {
            write!(f, "\n{indent}crs: {}", crs)?;
        }
        if let Some(uom) = &self.unit_of_measure {
            write!(f, "\n{indent}uom: {}", uom)?;
        }
        match &self.sampling {
            Some(Sampling::Regular { resolution }) => {
                write!(f, "\n{indent}resolution: {}", resolution)?;
                write!(f, "\n{indent}type: regular")?;
            }
            Some(Sampling::Irregular { coefficients }) => {
                write!(f, "\n{indent}type: irregular")?;
                let label = format!("{indent}coefficients: ");
                let items: Vec<String> = coefficients.iter().map(Scalar::to_string).collect();
                write!(
                    f,
                    "\n{}{}",
                    label,
                    wrap_list(&items, label.len() + 1, COEFFICIENTS_WIDTH)
                )?;
            }
            None => {}
        }
        Ok(())
    }
}

/// Renders `[a, b, ...]`, breaking lines so that none exceeds `width` when
/// continuation lines are indented by `indent` columns.
fn wrap_list(items: &[String], indent: usize, width: usize) -> String {
    let text = format!("[{}]", items.join(", "));
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split(' ') {
        if !line.is_empty() && indent + line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    lines.push(line);
    lines.join(&format!("\n{}", " ".repeat(indent)))
}
