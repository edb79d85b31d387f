//! Reading-order sorting.

use crate::model::ContentItem;

/// Sort items top-to-bottom, then left-to-right.
///
/// The sort is stable, so items with identical coordinates keep their
/// provider order. Multi-column and rotated layouts are not detected.
pub fn sort_reading_order(items: &mut [ContentItem]) {
    items.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });
}
