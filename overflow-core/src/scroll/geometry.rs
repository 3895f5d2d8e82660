//! Pure scroll arithmetic.
//!
//! Nothing here touches the page: every function maps measured lengths to
//! derived lengths. All values are CSS pixels.

use crate::Vec2;

/// Maximum legal positions, recomputed on every geometry pass.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Bounds {
    /// Maximum scroll offset of the content on each axis. Never negative.
    pub content_max: Vec2,
    /// Maximum travel of the thumb inside the track.
    ///
    /// Negative when the thumb is longer than the track.
    pub track_max: f64,
}

impl Bounds {
    /// Computes the bounds from measured extents.
    pub fn new(scroll_size: Vec2, visible_size: Vec2, track_max: f64) -> Self {
        Bounds {
            content_max: scroll_size.zip_map(visible_size, content_max),
            track_max,
        }
    }
}

/// Maximum scroll offset: `max(scroll_extent - visible_extent, 0)`.
pub fn content_max(scroll_extent: f64, visible_extent: f64) -> f64 {
    (scroll_extent - visible_extent).max(0.0)
}

/// Maximum thumb travel: `track - thumb - top - bottom`.
pub fn track_max(track_length: f64, thumb_length: f64, top_offset: f64, bottom_offset: f64) -> f64 {
    track_length - thumb_length - top_offset - bottom_offset
}

/// Returns `offset / content_max`, or 0 when there is nothing to scroll.
pub fn offset_ratio(offset: f64, content_max: f64) -> f64 {
    let ratio = offset / content_max;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Position of the thumb inside the track for a scroll ratio.
///
/// A NaN ratio counts as 0.
pub fn ratio_to_track_position(ratio: f64, track_max: f64, top_offset: f64) -> f64 {
    if ratio.is_nan() {
        top_offset
    } else {
        ratio * track_max + top_offset
    }
}

/// Maps a pointer position during a drag to a content offset.
///
/// `drag_start_offset` is the distance between the pointer and the top of the
/// thumb when the drag started. The thumb top then sits at
/// `pointer_y - track_origin_y - drag_start_offset` inside the track, of which
/// the first `top_offset` pixels are not part of the travel range.
///
/// The result is not clamped.
pub fn pointer_to_content_offset(
    pointer_y: f64,
    track_origin_y: f64,
    drag_start_offset: f64,
    top_offset: f64,
    content_max: f64,
    track_max: f64,
) -> f64 {
    if track_max == 0.0 {
        return 0.0;
    }
    (pointer_y - track_origin_y - drag_start_offset - top_offset) * (content_max / track_max)
}

/// Length of a resizable thumb: `track * visible / total`.
///
/// Fills the track when the total extent is unknown.
pub fn thumb_length(track_length: f64, visible_extent: f64, total_extent: f64) -> f64 {
    if total_extent <= 0.0 {
        track_length
    } else {
        track_length * visible_extent / total_extent
    }
}

/// Clamps a requested offset to `[0, content_max]`. NaN becomes 0.
pub fn clamp_offset(target: f64, content_max: f64) -> f64 {
    if target.is_nan() {
        0.0
    } else {
        target.max(0.0).min(content_max.max(0.0))
    }
}
