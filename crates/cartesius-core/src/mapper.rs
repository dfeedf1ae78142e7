//! Coordinate transformation from user space to pixel space
//!
//! Pixel space has its origin at the top-left corner with y increasing
//! downward, so the y axis is flipped: larger user `y` maps to a smaller
//! pixel row.

use embedded_graphics::prelude::Point;

use crate::bounds::{Bounds, DataPoint};
use crate::{CartesiusError, CartesiusResult};

/// Map a user-space point to pixel coordinates
///
/// Fails if `bounds` is not fully set, has a zero or negative extent, or has
/// no (or a zero) image size.
pub fn map(x: f64, y: f64, bounds: &Bounds) -> CartesiusResult<(f64, f64)> {
    Ok(CoordinateMapper::new(bounds)?.map(x, y))
}

/// Validated user-space to pixel-space transform
///
/// Construction checks every precondition once; mapping is infallible
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
    image_width: f64,
    image_height: f64,
}

impl CoordinateMapper {
    /// Create a mapper for the given bounds
    pub fn new(bounds: &Bounds) -> CartesiusResult<Self> {
        let (image_width, image_height) = match bounds.image_size() {
            Some((w, h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(CartesiusError::precondition(format!(
                    "cannot map coordinates without a non-zero image size: {bounds}"
                )));
            }
        };

        // Checks that every edge is set and both extents are positive
        bounds.width_height()?;

        let (Some(left), Some(right), Some(bottom), Some(top)) =
            (bounds.left(), bounds.right(), bounds.bottom(), bounds.top())
        else {
            return Err(CartesiusError::precondition(format!(
                "bounds are not fully set: {bounds}"
            )));
        };

        Ok(Self {
            left,
            right,
            bottom,
            top,
            image_width: image_width as f64,
            image_height: image_height as f64,
        })
    }

    /// Left edge of the mapped window in user units
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Right edge of the mapped window in user units
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Bottom edge of the mapped window in user units
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Top edge of the mapped window in user units
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Image size in pixels
    pub fn image_size(&self) -> (f64, f64) {
        (self.image_width, self.image_height)
    }

    /// Pixels per user unit along each axis
    pub fn pixels_per_unit(&self) -> (f64, f64) {
        (
            self.image_width / (self.right - self.left),
            self.image_height / (self.top - self.bottom),
        )
    }

    /// Map a user-space point to (sub-)pixel coordinates
    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        let x_ratio = (x - self.left) / (self.right - self.left);
        let y_ratio = (y - self.bottom) / (self.top - self.bottom);

        (
            x_ratio * self.image_width,
            self.image_height - y_ratio * self.image_height,
        )
    }

    /// Map a data point to (sub-)pixel coordinates
    pub fn map_data(&self, point: DataPoint) -> (f64, f64) {
        self.map(point.x, point.y)
    }

    /// Map a user-space point to the nearest pixel
    pub fn map_point(&self, x: f64, y: f64) -> Point {
        to_pixel(self.map(x, y))
    }

    /// Clip a pixel-space segment to the image extended by `margin` pixels
    ///
    /// Returns the visible part rounded to pixels, or `None` if the segment
    /// lies entirely outside or has a non-finite endpoint.
    pub fn clip_segment(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        margin: f64,
    ) -> Option<(Point, Point)> {
        if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
            return None;
        }

        let (x_min, y_min) = (-margin, -margin);
        let (x_max, y_max) = (self.image_width + margin, self.image_height + margin);
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;

        // Liang-Barsky parametric clipping
        let mut t_enter: f64 = 0.0;
        let mut t_exit: f64 = 1.0;
        let edges = [
            (-dx, from.0 - x_min),
            (dx, x_max - from.0),
            (-dy, from.1 - y_min),
            (dy, y_max - from.1),
        ];

        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }

            let t = q / p;
            if p < 0.0 {
                if t > t_exit {
                    return None;
                }
                t_enter = t_enter.max(t);
            } else {
                if t < t_enter {
                    return None;
                }
                t_exit = t_exit.min(t);
            }
        }

        Some((
            to_pixel((from.0 + t_enter * dx, from.1 + t_enter * dy)),
            to_pixel((from.0 + t_exit * dx, from.1 + t_exit * dy)),
        ))
    }
}

/// Round sub-pixel coordinates to the nearest pixel
pub(crate) fn to_pixel((x, y): (f64, f64)) -> Point {
    Point::new(x.round() as i32, y.round() as i32)
}
