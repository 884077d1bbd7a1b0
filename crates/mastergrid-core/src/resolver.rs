//! Point-to-key resolution.
//!
//! Called on every touch frame, so lookups avoid a full scan: the row is found
//! by its vertical band, the key inside the row by binary search on the right
//! edges. Zones never overlap, so the answer matches a row-major linear scan.

use crate::geometry::Point;
use crate::layout::{KeyZone, Layout};

/// The zone containing `point`, or `None` for dead space.
pub fn resolve(layout: &Layout, point: Point) -> Option<&KeyZone> {
    let row = layout.iter_rows().find(|row| {
        row.first()
            .map(|zone| {
                let region = zone.region();
                point.y >= region.top && point.y < region.bottom
            })
            .unwrap_or(false)
    })?;

    let index = row.partition_point(|zone| zone.region().right <= point.x);
    row.get(index).filter(|zone| zone.contains(point))
}

/// Vertical center of a zone, the reference line for aftertouch.
#[inline]
pub fn center_of(zone: &KeyZone) -> f32 {
    zone.center_y()
}
