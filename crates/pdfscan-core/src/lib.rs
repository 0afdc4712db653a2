//! pdfscan-core: Backend-independent data types.
//!
//! This crate provides the foundational value types (matrices, bounding
//! boxes, paths, colors) and the warning/option types used by
//! pdfscan-content. It has no required external dependencies.

pub mod error;
pub mod geometry;
pub mod painting;
pub mod path;

pub use error::{ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode};
pub use geometry::{BBox, Ctm, Point};
pub use painting::Color;
pub use path::{Path, PathSegment};
