//! User-space bounds of a plot
//!
//! [`Bounds`] is the rectangle of user coordinates that gets mapped onto the
//! full image, together with the image size it will be mapped onto. It is an
//! immutable value: every operation returns a new `Bounds`, so element
//! footprints and the plot's aggregate window never alias each other.

use core::fmt;

use crate::{CartesiusError, CartesiusResult};

/// A point in user space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataPoint {
    /// X coordinate in user units
    pub x: f64,
    /// Y coordinate in user units
    pub y: f64,
}

impl DataPoint {
    /// Create a new data point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Rectangle in user coordinates plus the target image size
///
/// Each edge starts unset and is widened by [`Bounds::update_point`] and
/// [`Bounds::union`]. Once all four edges are set, `left <= right` and
/// `bottom <= top` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    left: Option<f64>,
    right: Option<f64>,
    bottom: Option<f64>,
    top: Option<f64>,
    image_width: Option<u32>,
    image_height: Option<u32>,
}

impl Bounds {
    /// Bounds with no edge set and no image size
    pub const EMPTY: Self = Self {
        left: None,
        right: None,
        bottom: None,
        top: None,
        image_width: None,
        image_height: None,
    };

    /// The `[-1, 1] x [-1, 1]` square used by a plot without elements
    pub const UNIT: Self = Self {
        left: Some(-1.0),
        right: Some(1.0),
        bottom: Some(-1.0),
        top: Some(1.0),
        image_width: None,
        image_height: None,
    };

    /// Create bounds with all four edges set
    ///
    /// Fails unless every edge is finite, `left < right` and `bottom < top`.
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> CartesiusResult<Self> {
        if ![left, right, bottom, top].iter().all(|edge| edge.is_finite()) {
            return Err(CartesiusError::precondition(format!(
                "bounds edges must be finite (left={left}, right={right}, bottom={bottom}, top={top})"
            )));
        }
        if left >= right {
            return Err(CartesiusError::precondition(format!(
                "left bound ({left}) must be less than right bound ({right})"
            )));
        }
        if bottom >= top {
            return Err(CartesiusError::precondition(format!(
                "bottom bound ({bottom}) must be less than top bound ({top})"
            )));
        }

        Ok(Self {
            left: Some(left),
            right: Some(right),
            bottom: Some(bottom),
            top: Some(top),
            ..Self::EMPTY
        })
    }

    /// Left edge, if set
    pub fn left(&self) -> Option<f64> {
        self.left
    }

    /// Right edge, if set
    pub fn right(&self) -> Option<f64> {
        self.right
    }

    /// Bottom edge, if set
    pub fn bottom(&self) -> Option<f64> {
        self.bottom
    }

    /// Top edge, if set
    pub fn top(&self) -> Option<f64> {
        self.top
    }

    /// Target image size, if set
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_width.zip(self.image_height)
    }

    /// True iff all four edges are set
    pub fn is_set(&self) -> bool {
        self.left.is_some() && self.right.is_some() && self.bottom.is_some() && self.top.is_some()
    }

    /// Same rectangle, mapped onto an image of the given size
    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_width = Some(width);
        self.image_height = Some(height);
        self
    }

    /// Clear all four edges, keeping the image size
    pub fn reset(self) -> Self {
        Self {
            image_width: self.image_width,
            image_height: self.image_height,
            ..Self::EMPTY
        }
    }

    /// Widen the bounds to include a point
    ///
    /// Non-finite coordinates are ignored so a function pole never turns the
    /// whole window infinite.
    pub fn update_point(self, point: DataPoint) -> Self {
        self.update_x(point.x).update_y(point.y)
    }

    /// Widen the horizontal extent to include `x`
    pub fn update_x(mut self, x: f64) -> Self {
        (self.left, self.right) = widen(x, self.left, self.right);
        self
    }

    /// Widen the vertical extent to include `y`
    pub fn update_y(mut self, y: f64) -> Self {
        (self.bottom, self.top) = widen(y, self.bottom, self.top);
        self
    }

    /// Widen the bounds to include every edge set on `other`
    ///
    /// The image size of `self` is kept.
    pub fn union(self, other: &Bounds) -> Self {
        [other.left, other.right]
            .into_iter()
            .flatten()
            .fold(self, Self::update_x)
            .union_y(other)
    }

    fn union_y(self, other: &Bounds) -> Self {
        [other.bottom, other.top]
            .into_iter()
            .flatten()
            .fold(self, Self::update_y)
    }

    /// Width and height of the rectangle
    ///
    /// Fails unless all four edges are set and both extents are positive.
    pub fn width_height(&self) -> CartesiusResult<(f64, f64)> {
        let (Some(left), Some(right), Some(bottom), Some(top)) =
            (self.left, self.right, self.bottom, self.top)
        else {
            return Err(CartesiusError::precondition(format!(
                "bounds are not fully set: {self}"
            )));
        };

        let width = right - left;
        let height = top - bottom;
        if !(width > 0.0 && height > 0.0) {
            return Err(CartesiusError::precondition(format!(
                "bounds must have a positive width and height: {self}"
            )));
        }

        Ok((width, height))
    }

    /// Center of the rectangle, if all edges are set
    pub fn center(&self) -> Option<DataPoint> {
        match (self.left, self.right, self.bottom, self.top) {
            (Some(left), Some(right), Some(bottom), Some(top)) => Some(DataPoint::new(
                (left + right) / 2.0,
                (bottom + top) / 2.0,
            )),
            _ => None,
        }
    }

    /// Grow the rectangle so its aspect ratio matches the image's
    ///
    /// The shorter side grows equally on both ends, so the existing content
    /// stays centered and is never cropped.
    pub fn update_to_image_size(self) -> CartesiusResult<Self> {
        let (image_width, image_height) = match self.image_size() {
            Some((w, h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(CartesiusError::precondition(format!(
                    "image size must be set and non-zero: {self}"
                )));
            }
        };

        let (width, height) = self.width_height()?;
        let desired_ratio = image_width as f64 / image_height as f64;
        let mut out = self;

        if width / height > desired_ratio {
            let grow = (width / desired_ratio - height) / 2.0;
            out.bottom = self.bottom.map(|bottom| bottom - grow);
            out.top = self.top.map(|top| top + grow);
        } else {
            let grow = (height * desired_ratio - width) / 2.0;
            out.left = self.left.map(|left| left - grow);
            out.right = self.right.map(|right| right + grow);
        }

        Ok(out)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn edge(value: Option<f64>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }
        fn dim(value: Option<u32>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }

        write!(
            f,
            "[bounds:{},{},{},{}, image:{},{}]",
            edge(self.left),
            edge(self.right),
            edge(self.bottom),
            edge(self.top),
            dim(self.image_width),
            dim(self.image_height)
        )
    }
}

/// Min/max union of `value` with an optional range, unset ends absorbing
fn widen(value: f64, low: Option<f64>, high: Option<f64>) -> (Option<f64>, Option<f64>) {
    if !value.is_finite() {
        return (low, high);
    }

    (
        Some(low.map_or(value, |low| low.min(value))),
        Some(high.map_or(value, |high| high.max(value))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn fold_points(points: &[DataPoint]) -> Bounds {
        points
            .iter()
            .copied()
            .fold(Bounds::EMPTY, Bounds::update_point)
    }

    fn edges(bounds: &Bounds) -> (f64, f64, f64, f64) {
        (
            bounds.left().unwrap(),
            bounds.right().unwrap(),
            bounds.bottom().unwrap(),
            bounds.top().unwrap(),
        )
    }

    #[test]
    fn test_update_is_order_independent() {
        let points = [
            DataPoint::new(3.0, -1.0),
            DataPoint::new(-2.0, 4.0),
            DataPoint::new(0.5, 0.5),
            DataPoint::new(7.0, -3.5),
        ];
        let expected = edges(&fold_points(&points));
        assert_eq!(expected, (-2.0, 7.0, -3.5, 4.0));

        let mut permuted = points;
        for rotation in 0..points.len() {
            permuted.rotate_left(1);
            assert_eq!(
                edges(&fold_points(&permuted)),
                expected,
                "rotation {rotation} changed the result"
            );
            let mut reversed = permuted;
            reversed.reverse();
            assert_eq!(edges(&fold_points(&reversed)), expected);
        }
    }

    #[test]
    fn test_update_is_idempotent() {
        let once = Bounds::EMPTY.update_point(DataPoint::new(1.0, 2.0));
        let twice = once.update_point(DataPoint::new(1.0, 2.0));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_union_matches_point_fold() {
        let a = fold_points(&[DataPoint::new(0.0, 0.0), DataPoint::new(1.0, 1.0)]);
        let b = fold_points(&[DataPoint::new(-5.0, 2.0), DataPoint::new(-4.0, 3.0)]);

        assert_eq!(edges(&a.union(&b)), (-5.0, 1.0, 0.0, 3.0));
        assert_eq!(edges(&a.union(&b)), edges(&b.union(&a)));
        assert_eq!(Bounds::EMPTY.union(&Bounds::EMPTY), Bounds::EMPTY);
    }

    #[test]
    fn test_union_keeps_own_image_size() {
        let a = Bounds::UNIT.with_image_size(10, 20);
        let b = Bounds::new(0.0, 5.0, 0.0, 5.0).unwrap().with_image_size(1, 1);
        assert_eq!(a.union(&b).image_size(), Some((10, 20)));
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let bounds = Bounds::EMPTY
            .update_point(DataPoint::new(1.0, f64::INFINITY))
            .update_point(DataPoint::new(f64::NAN, 2.0));
        assert_eq!(bounds.left(), Some(1.0));
        assert_eq!(bounds.right(), Some(1.0));
        assert_eq!(bounds.bottom(), Some(2.0));
        assert_eq!(bounds.top(), Some(2.0));
    }

    #[test]
    fn test_width_height_requires_all_edges() {
        let partial = Bounds::EMPTY.update_x(1.0).update_x(2.0);
        assert!(!partial.is_set());
        assert!(matches!(
            partial.width_height(),
            Err(CartesiusError::Precondition { .. })
        ));
    }

    #[test]
    fn test_width_height_rejects_degenerate_extent() {
        let flat = fold_points(&[DataPoint::new(0.0, 1.0), DataPoint::new(2.0, 1.0)]);
        assert!(flat.is_set());
        assert!(flat.width_height().is_err(), "Zero height must fail");
        assert_eq!(Bounds::UNIT.width_height(), Ok((2.0, 2.0)));
    }

    #[test]
    fn test_new_validates_edges() {
        assert!(Bounds::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(Bounds::new(0.0, 1.0, 1.0, 1.0).is_err());
        assert!(Bounds::new(0.0, f64::NAN, 0.0, 1.0).is_err());
        assert!(Bounds::new(0.0, 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_reset_keeps_image_size() {
        let bounds = Bounds::UNIT.with_image_size(30, 40).reset();
        assert!(!bounds.is_set());
        assert_eq!(bounds.image_size(), Some((30, 40)));
    }

    #[test]
    fn test_update_to_image_size_grows_horizontally() {
        let bounds = Bounds::UNIT.with_image_size(200, 100);
        let fitted = bounds.update_to_image_size().unwrap();

        assert_eq!(edges(&fitted), (-2.0, 2.0, -1.0, 1.0));
    }

    #[test]
    fn test_update_to_image_size_grows_vertically() {
        let bounds = Bounds::new(0.0, 10.0, 0.0, 2.0)
            .unwrap()
            .with_image_size(100, 100);
        let fitted = bounds.update_to_image_size().unwrap();

        assert_eq!(edges(&fitted), (0.0, 10.0, -4.0, 6.0));
    }

    #[test]
    fn test_update_to_image_size_preserves_center_and_only_grows() {
        let cases = [
            (Bounds::new(-3.0, 5.0, 1.0, 2.0).unwrap(), (640, 480)),
            (Bounds::new(0.0, 1.0, -10.0, 10.0).unwrap(), (320, 240)),
            (Bounds::new(2.0, 4.0, 2.0, 4.0).unwrap(), (100, 300)),
            (Bounds::new(-1.0, 1.0, -1.0, 1.0).unwrap(), (333, 333)),
        ];

        for (bounds, (w, h)) in cases {
            let original = bounds.with_image_size(w, h);
            let fitted = original.update_to_image_size().unwrap();

            let before = original.center().unwrap();
            let after = fitted.center().unwrap();
            assert!((before.x - after.x).abs() < EPSILON);
            assert!((before.y - after.y).abs() < EPSILON);

            let (l0, r0, b0, t0) = edges(&original);
            let (l1, r1, b1, t1) = edges(&fitted);
            assert!(l1 <= l0 && r1 >= r0 && b1 <= b0 && t1 >= t0, "{fitted} shrank");

            let (width, height) = fitted.width_height().unwrap();
            let ratio = w as f64 / h as f64;
            assert!(
                (width / height - ratio).abs() < 1e-9,
                "ratio {} != {}",
                width / height,
                ratio
            );
        }
    }

    #[test]
    fn test_update_to_image_size_requires_image_size() {
        assert!(Bounds::UNIT.update_to_image_size().is_err());
        assert!(
            Bounds::UNIT
                .with_image_size(0, 10)
                .update_to_image_size()
                .is_err()
        );
    }

    #[test]
    fn test_display() {
        let text = Bounds::UNIT.with_image_size(4, 3).to_string();
        assert_eq!(text, "[bounds:-1,1,-1,1, image:4,3]");
        assert_eq!(Bounds::EMPTY.to_string(), "[bounds:-,-,-,-, image:-,-]");
    }
}
