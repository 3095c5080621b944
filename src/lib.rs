//! A small Rust client for OGC Web Coverage Service (WCS) endpoints.
//!
//! The crate reads the two metadata documents of a WCS server and maps them
//! onto a typed coverage model:
//! - *GetCapabilities*: every coverage with its native and lon/lat bounding
//!   boxes ([`BasicCoverage`]);
//! - *DescribeCoverage*: one coverage in full, with sampled axes, grid extent,
//!   bands and free-form metadata ([`FullCoverage`]).
//!
//! Cell data is not retrieved.
//!
//! ## Quick start
//! - Configure the endpoint via the environment (`WCS_ENDPOINT`, plus
//!   `WCS_USERNAME`/`WCS_PASSWORD` if the server needs them) or a `.wcsrc`
//!   file (in the current directory or in your home directory), or build a
//!   [`ServiceConfig`] directly.
//! - Call [`WebCoverageService::list_coverages`] or
//!   [`WebCoverageService::list_full_info`].
//!
//! ```no_run
//! use wcs_client::{ServiceConfig, WebCoverageService};
//!
//! fn main() -> wcs_client::Result<()> {
//!     let service = WebCoverageService::new(ServiceConfig::new(
//!         "https://ows.rasdaman.org/rasdaman/ows",
//!     ))?;
//!     let coverage = service.list_full_info("AvgLandTemp")?;
//!     let lat = &coverage.native_bbox()["Lat"];
//!     println!("Lat resolution: {:?}", lat.resolution());
//!     println!("{coverage}");
//!     Ok(())
//! }
//! ```
//!
//! Documents obtained elsewhere can be parsed without a server:
//!
//! ```
//! use wcs_client::{Element, coverage_descriptions};
//!
//! let xml = br#"<CoverageDescriptions/>"#;
//! let root = Element::parse(xml)?;
//! assert!(coverage_descriptions(&root).is_empty());
//! # Ok::<(), wcs_client::WcsError>(())
//! ```

#![forbid(unsafe_code)]

pub mod crs;
pub mod model;

mod config;
mod error;
mod parser;
mod service;
mod transport;
mod xml;

pub use config::{Credentials, ServiceConfig, load_config};
pub use crs::{Crs, CrsComponent};
pub use error::{Result, WcsError};
pub use model::{
    Axis, BasicCoverage, BoundingBox, Field, FieldKind, FullCoverage, NilValue, Node, RangeType,
    Resolution, Sampling, Scalar,
};
pub use parser::{coverage_descriptions, parse_capabilities, parse_description};
pub use service::WebCoverageService;
pub use transport::{HttpResponse, HttpTransport, Transport};
pub use xml::Element;
