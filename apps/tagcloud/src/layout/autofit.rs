//! Auto-Fitter: rescales and recenters the placed arrangement so it fills
//! the container with a uniform padding.
//!
//! The scale is applied once to the whole container about its center, so
//! relative spacing between elements is preserved. Under that convention the
//! union box ends up centered when every element is shifted by
//! `container_center - union_center`, whatever the scale factor is.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::{Rect, Size};

/// Fraction of the smaller container side kept free on every edge.
pub const PADDING_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitAdjustment {
    /// Uniform scale factor, truncated to two decimals.
    pub scale: f64,
    /// Offset added to every element's position.
    pub dx: f64,
    pub dy: f64,
}

/// Union of all live boxes, `None` when there are none.
pub fn union_box<'a>(boxes: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
    boxes.into_iter().fold(None, |acc, r| match acc {
        None => Some(*r),
        Some(u) => Some(u.union(r)),
    })
}

/// Truncates `|available / extent|` to two decimal places.
fn axis_scale(available: f64, extent: f64) -> f64 {
    ((available / extent).abs() * 100.0).floor() / 100.0
}

/// Computes the fit for a container and the live boxes of its elements.
///
/// Returns `None` for an empty element set or a degenerate union box, in
/// which case nothing should be scaled or moved.
pub fn compute_fit(container: Size, boxes: &[Rect]) -> Option<FitAdjustment> {
    let bounds = union_box(boxes)?;
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return None;
    }

    let padding = PADDING_FRACTION * container.min_side();
    let available_w = container.width - 2.0 * padding;
    let available_h = container.height - 2.0 * padding;

    let scale = axis_scale(available_w, bounds.width()).min(axis_scale(available_h, bounds.height()));
    if !scale.is_finite() {
        return None;
    }

    let center = bounds.center();
    Some(FitAdjustment {
        scale,
        dx: container.width / 2.0 - center.x,
        dy: container.height / 2.0 - center.y,
    })
}
