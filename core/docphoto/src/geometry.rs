//! Preview-space to source-space crop mapping.
//!
//! The interactive cropper draws its rectangle on a downscaled preview; the
//! crop itself must be taken from the full-resolution image. [`PreviewScale`]
//! keeps the exact preview/source width ratio as an integer pair so the
//! inverse mapping is pure integer arithmetic with a single, pinned
//! truncation policy (floor).

/// Axis-aligned rectangle in pixel coordinates.
///
/// The coordinate space (preview or source) is determined by how the caller
/// obtained it; [`map_to_source`] converts between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// X coordinate of the left edge.
    pub left: u32,
    /// Y coordinate of the top edge.
    pub top: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Whether the rectangle lies fully within an `image_width` ×
    /// `image_height` image.
    pub fn contained_in(&self, image_width: u32, image_height: u32) -> bool {
        let right = self.left as u64 + self.width as u64;
        let bottom = self.top as u64 + self.height as u64;
        right <= image_width as u64 && bottom <= image_height as u64
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// The exact rational scale `preview_width / source_width` relating the
/// downscaled preview to the full-resolution source.
///
/// Stored as the integer pair rather than a float so that mapping back to
/// source space divides out exactly: a preview produced at `500 / 3000`
/// maps `left = 100` to `100 * 3000 / 500 = 600`, with no float residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewScale {
    preview_width: u32,
    source_width: u32,
}

impl PreviewScale {
    /// Build a scale from the preview and source widths.
    ///
    /// # Panics
    ///
    /// Panics if either width is zero — a zero-width image reaching the
    /// preview stage is an upstream bug, not a recoverable condition.
    pub fn new(preview_width: u32, source_width: u32) -> Self {
        assert!(
            preview_width > 0 && source_width > 0,
            "preview scale from zero-width image ({preview_width}/{source_width})"
        );
        Self {
            preview_width,
            source_width,
        }
    }

    /// Identity scale: preview and source coordinates coincide.
    pub fn identity(source_width: u32) -> Self {
        Self::new(source_width, source_width)
    }

    /// The scale as a float, in `(0, 1]` when the preview is a downscale.
    pub fn factor(&self) -> f64 {
        self.preview_width as f64 / self.source_width as f64
    }

    /// Whether preview and source coordinates coincide.
    pub fn is_identity(&self) -> bool {
        self.preview_width == self.source_width
    }

    /// Map one preview-space coordinate to source space, truncating toward
    /// zero. `u64` intermediate keeps `coord * source_width` from wrapping.
    fn map_coord(&self, coord: u32) -> u32 {
        (coord as u64 * self.source_width as u64 / self.preview_width as u64) as u32
    }
}

/// Rescale a preview-space crop rectangle into source-space coordinates.
///
/// Each field is scaled independently and floored. No bounds clamping is
/// performed: the caller validates the result against the source image
/// before cropping (see [`Rect::contained_in`]).
pub fn map_to_source(rect: Rect, scale: PreviewScale) -> Rect {
    Rect {
        left: scale.map_coord(rect.left),
        top: scale.map_coord(rect.top),
        width: scale.map_coord(rect.width),
        height: scale.map_coord(rect.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_scale_maps_to_itself() {
        let rect = Rect {
            left: 13,
            top: 27,
            width: 301,
            height: 402,
        };
        let scale = PreviewScale::identity(800);
        assert_eq!(map_to_source(rect, scale), rect);
    }

    #[test]
    fn exact_rational_mapping() {
        // 3000x4000 source, preview max-width 500 → scale 500/3000.
        let scale = PreviewScale::new(500, 3000);
        let rect = Rect {
            left: 100,
            top: 50,
            width: 300,
            height: 400,
        };
        // Integer rational arithmetic is exact here: 100 * 3000 / 500 = 600,
        // where float division by 0.1667 would land on 599.88 and floor to 599.
        let mapped = map_to_source(rect, scale);
        assert_eq!(
            mapped,
            Rect {
                left: 600,
                top: 300,
                width: 1800,
                height: 2400,
            }
        );
    }

    #[test]
    fn truncation_floors_sub_pixel_remainders() {
        // scale 3/7: 5 * 7 / 3 = 11.67 → 11
        let scale = PreviewScale::new(3, 7);
        let rect = Rect {
            left: 5,
            top: 1,
            width: 2,
            height: 3,
        };
        let mapped = map_to_source(rect, scale);
        assert_eq!(mapped.left, 11);
        assert_eq!(mapped.top, 2); // 7/3 = 2.33 → 2
        assert_eq!(mapped.width, 4); // 14/3 = 4.67 → 4
        assert_eq!(mapped.height, 7);
    }

    #[test]
    fn mapped_rect_stays_within_source_bounds() {
        // Preview rect inside [0,500]x[0,666] maps inside [0,3000]x[0,4000].
        let scale = PreviewScale::new(500, 3000);
        let rect = Rect {
            left: 200,
            top: 266,
            width: 300,
            height: 400,
        };
        let mapped = map_to_source(rect, scale);
        assert!(mapped.contained_in(3000, 4000));
    }

    #[test]
    fn contained_in_rejects_overflowing_rect() {
        let rect = Rect {
            left: 100,
            top: 0,
            width: 50,
            height: 50,
        };
        assert!(rect.contained_in(150, 50));
        assert!(!rect.contained_in(149, 50));
        assert!(!rect.contained_in(150, 49));
    }

    #[test]
    fn contained_in_handles_u32_edge_without_overflow() {
        let rect = Rect {
            left: u32::MAX - 1,
            top: 0,
            width: 2,
            height: 1,
        };
        assert!(!rect.contained_in(u32::MAX - 1, 1));
    }

    #[test]
    #[should_panic(expected = "zero-width image")]
    fn zero_source_width_panics() {
        PreviewScale::new(500, 0);
    }

    #[test]
    #[should_panic(expected = "zero-width image")]
    fn zero_preview_width_panics() {
        PreviewScale::new(0, 3000);
    }

    #[test]
    fn factor_matches_ratio() {
        let scale = PreviewScale::new(500, 3000);
        assert!((scale.factor() - 1.0 / 6.0).abs() < 1e-12);
        assert!(!scale.is_identity());
        assert!(PreviewScale::identity(42).is_identity());
    }
}
