//! Coverage description model.
//!
//! Everything here is immutable once built; the parsers are the only producers
//! in the crate, but the constructors are public so callers can assemble
//! models by hand (in tests, for instance).

pub mod axis;
pub mod bbox;
pub mod coverage;
pub mod metadata;
pub mod range_type;
pub mod scalar;

pub use axis::{Axis, Resolution, Sampling};
pub use bbox::BoundingBox;
pub use coverage::{BasicCoverage, FullCoverage};
pub use metadata::Node;
pub use range_type::{Field, FieldKind, NilValue, RangeType};
pub use scalar::Scalar;
