//! Spray dimension fitting.
//!
//! Decal textures must be 16-aligned on both axes and stay under a fixed
//! surface budget. [`fit_dimensions`] maps an arbitrary source resolution onto
//! that grid while keeping the aspect ratio as close as the grid allows.

/// Maximum spray surface in pixels (exclusive upper bound on `width * height`).
pub const SPRAY_MAX_SURFACE: u32 = 12228;

/// Alignment of both spray dimensions.
pub const GRID: u32 = 16;

/// Size used when no aligned candidate fits the surface budget.
pub const FALLBACK_SIZE: (u32, u32) = (GRID, GRID);

/// Compute the spray dimensions for a `width` x `height` source.
///
/// Walks candidate heights from the tallest aligned height downwards in steps
/// of [`GRID`]. For each height the width follows from the source aspect
/// ratio, floored to the grid. The first (tallest) candidate whose width is
/// in `GRID..=width` and whose surface is below [`SPRAY_MAX_SURFACE`] wins;
/// candidates are never compared against each other. When nothing qualifies,
/// [`FALLBACK_SIZE`] is returned.
///
/// The aspect product is evaluated as an exact rational (`h * width / height`
/// floored), so a source that already satisfies the constraints maps onto
/// itself.
///
/// # Example
///
/// ```
/// use spray_index::fit_dimensions;
///
/// assert_eq!(fit_dimensions(200, 150), (96, 80));
/// assert_eq!(fit_dimensions(1, 1), (16, 16));
/// ```
pub fn fit_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return FALLBACK_SIZE;
    }

    let mut h = (height / GRID) * GRID;
    while h >= GRID {
        let scaled = u64::from(h) * u64::from(width) / u64::from(height);
        let w = (scaled / u64::from(GRID)) * u64::from(GRID);

        if w < u64::from(GRID) || w > u64::from(width) {
            h -= GRID;
            continue;
        }
        if w * u64::from(h) < u64::from(SPRAY_MAX_SURFACE) {
            // w <= width, so the narrowing is lossless
            return (w as u32, h);
        }
        h -= GRID;
    }

    FALLBACK_SIZE
}

/// Whether `(width, height)` already satisfies every spray constraint.
pub fn is_spray_sized(width: u32, height: u32) -> bool {
    width >= GRID
        && height >= GRID
        && width % GRID == 0
        && height % GRID == 0
        && u64::from(width) * u64::from(height) < u64::from(SPRAY_MAX_SURFACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_example() {
        // h = 144, 128, 112, 96 exceed the surface budget; 80 is the first fit
        assert_eq!(fit_dimensions(200, 150), (96, 80));
    }

    #[test]
    fn test_tiny_source_falls_back() {
        assert_eq!(fit_dimensions(1, 1), (16, 16));
        assert_eq!(fit_dimensions(300, 15), (16, 16));
    }

    #[test]
    fn test_zero_dimensions_fall_back() {
        assert_eq!(fit_dimensions(0, 64), FALLBACK_SIZE);
        assert_eq!(fit_dimensions(64, 0), FALLBACK_SIZE);
    }

    #[test]
    fn test_square_source() {
        // 112x112 = 12544 is over budget, 96x96 = 9216 fits
        assert_eq!(fit_dimensions(256, 256), (96, 96));
        assert_eq!(fit_dimensions(64, 64), (64, 64));
    }

    #[test]
    fn test_tall_source_prefers_height() {
        // 64x256 is over budget; h = 240 gives w = 60 -> 48, 48 * 240 = 11520
        assert_eq!(fit_dimensions(64, 256), (48, 240));
        assert_eq!(fit_dimensions(20, 400), (16, 400));
    }

    #[test]
    fn test_narrow_source_rejects_thin_widths() {
        // Every candidate width floors below the grid
        assert_eq!(fit_dimensions(10, 400), (16, 16));
    }

    #[test]
    fn test_wide_source_is_not_narrowed() {
        // The only candidate height keeps the full 2000 columns, which is over
        // budget; the search never trades width for surface
        assert_eq!(fit_dimensions(2000, 16), (16, 16));
        assert_eq!(fit_dimensions(2000, 40), (16, 16));
    }

    #[test]
    fn test_already_fitting_source_is_unchanged() {
        assert_eq!(fit_dimensions(96, 80), (96, 80));
        assert_eq!(fit_dimensions(16, 16), (16, 16));
        assert_eq!(fit_dimensions(752, 16), (752, 16));
    }

    #[test]
    fn test_is_spray_sized() {
        assert!(is_spray_sized(96, 80));
        assert!(!is_spray_sized(96, 81));
        assert!(!is_spray_sized(112, 112));
        assert!(!is_spray_sized(0, 16));
    }
}
