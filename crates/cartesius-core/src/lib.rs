//! Cartesian coordinate plots rendered onto RGBA rasters
//!
//! This crate maps user-space coordinates onto pixel coordinates and draws
//! plot elements through `embedded-graphics`. It supports:
//!
//! - Automatic bounds that grow to fit every element added to a plot
//! - Aspect-ratio correction so one user unit has the same pixel length on
//!   both axes
//! - Axes with optional ticks, grid lines and numeric labels
//! - Lines, sampled function graphs, circles and key-value series
//! - Per-element transparency composited onto the shared image
//! - Supersampled antialiasing
//!
//! # Examples
//!
//! ```ignore
//! use cartesius_core::*;
//!
//! let mut plot = CoordinateSystem::new();
//! plot.add(GraphFunction::new(f64::sin, -3.0, 3.0, 0.05)?);
//! plot.add(Circle::new(0.0, 0.0, 1.0)?.with_style(ElementStyle::default().with_transparency(128)));
//!
//! let image = plot.render(400, 300, &RenderOptions::default().with_antialiasing(2.0))?;
//! assert_eq!(image.size(), (400, 300));
//! ```

use thiserror_no_std::Error;

pub mod bounds;
pub mod color;
pub mod constants;
pub mod elements;
pub mod mapper;
pub mod raster;
pub mod system;

pub use bounds::{Bounds, DataPoint};
pub use color::{ElementStyle, Rgba};
pub use elements::{
    Axis, Circle, Element, GraphFunction, KeyValueGraph, LabelPosition, Line, Orientation,
    PlotElement,
};
pub use mapper::{CoordinateMapper, map};
pub use raster::Raster;
pub use system::{CoordinateSystem, RenderOptions};

/// Error types for plot construction and rendering
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CartesiusError {
    /// Malformed geometry or bounds that cannot be mapped
    #[error("Precondition failed: {reason}")]
    Precondition {
        /// What was violated
        reason: String,
    },

    /// Invalid render or element configuration
    #[error("Invalid configuration: {reason}")]
    Configuration {
        /// What was rejected
        reason: String,
    },
}

impl CartesiusError {
    pub(crate) fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// Result type for plot operations
pub type CartesiusResult<T> = Result<T, CartesiusError>;
