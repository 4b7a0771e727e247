use crate::models::{CropRectangle, Point};

/// Turn a drag into a square crop rectangle.
///
/// The longer axis of the drag decides the side length. The `end` corner is
/// kept exactly; the `start` corner moves along the shorter axis only:
///
/// - `dy > dx`: `left = end.x - dy`, the other edges come from the drag.
/// - otherwise: `top = end.y - dx`, the other edges come from the drag.
///
/// Expects a top-left to bottom-right drag; callers order reversed drags with
/// [`crate::models::DragRegion::ordered`] first. Nothing is clamped to the
/// image and zero-extent drags yield zero-area rectangles.
pub fn normalize(start: Point, end: Point) -> CropRectangle {
    let (start_x, start_y) = (i64::from(start.x), i64::from(start.y));
    let (end_x, end_y) = (i64::from(end.x), i64::from(end.y));

    let dx = end_x - start_x;
    let dy = end_y - start_y;

    if dy > dx {
        CropRectangle::new(end_x - dy, start_y, end_x, end_y)
    } else {
        CropRectangle::new(start_x, end_y - dx, end_x, end_y)
    }
}
