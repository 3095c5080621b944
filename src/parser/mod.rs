//! Mapping of WCS documents onto the coverage model.
//!
//! The parsers work on an already tokenized [`Element`] tree, so they can be
//! fed from a live server or from a file on disk alike.

mod capabilities;
mod describe;

pub use capabilities::parse_capabilities;
pub use describe::{coverage_descriptions, parse_description};

use crate::error::{Result, WcsError};
use crate::model::Scalar;
use crate::xml::Element;

/// Lower and upper bounds of an OWS bounding box, pairwise.
fn parse_corners(bbox: &Element) -> Result<Vec<(Scalar, Scalar)>> {
    let lower = Scalar::parse_list(bbox.require_child("LowerCorner")?.text())?;
    let upper = Scalar::parse_list(bbox.require_child("UpperCorner")?.text())?;
    if lower.len() != upper.len() {
        return Err(WcsError::invalid(
            format!("{} corners", bbox.name()),
            format!("{} lower and {} upper bounds", lower.len(), upper.len()),
        ));
    }
    Ok(lower.into_iter().zip(upper).collect())
}
