//! Maps a pointer position to the path list a drop should feed.
//!
//! The window is split into three horizontal bands:
//!
//! ```text
//!   0.00 H  ┌───────────────┐
//!           │    source     │
//!   0.35 H  ├───────────────┤
//!           │    target     │
//!   0.55 H  ├───────────────┤
//!           │ source (rest) │
//!   1.00 H  └───────────────┘
//! ```
//!
//! Lower bounds are inclusive and upper bounds exclusive. Anything outside
//! the target band, including positions off-window or a window with no
//! height, falls back to `Source`.

use std::fmt;

/// Start of the target band as a fraction of the window height.
pub const TARGET_BAND_START: f64 = 0.35;
/// End (exclusive) of the target band as a fraction of the window height.
pub const TARGET_BAND_END: f64 = 0.55;

/// Logical destination of dropped paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    Source,
    Target,
}

impl fmt::Display for DropZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropZone::Source => write!(f, "source"),
            DropZone::Target => write!(f, "target"),
        }
    }
}

/// Classify a vertical pointer position.
pub fn classify(y: f64, window_height: f64) -> DropZone {
    if !y.is_finite() || !window_height.is_finite() || window_height <= 0.0 {
        return DropZone::Source;
    }

    // Whole-pixel edges divide exactly onto the band constants
    let fraction = y / window_height;

    if fraction >= TARGET_BAND_START && fraction < TARGET_BAND_END {
        DropZone::Target
    } else {
        DropZone::Source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        let h = 800.0;
        assert_eq!(classify(0.0, h), DropZone::Source);
        assert_eq!(classify(0.2 * h, h), DropZone::Source);
        assert_eq!(classify(0.45 * h, h), DropZone::Target);
        assert_eq!(classify(0.8 * h, h), DropZone::Source);
        assert_eq!(classify(h, h), DropZone::Source);
    }

    #[test]
    fn test_whole_pixel_edges() {
        assert_eq!(classify(35.0, 100.0), DropZone::Target);
        assert_eq!(classify(55.0, 100.0), DropZone::Source);
        assert_eq!(classify(110.0, 200.0), DropZone::Source);
        assert_eq!(classify(220.0, 400.0), DropZone::Source);
        assert_eq!(classify(140.0, 400.0), DropZone::Target);
        assert_eq!(classify(219.0, 400.0), DropZone::Target);
        assert_eq!(classify(139.0, 400.0), DropZone::Source);
    }

    #[test]
    fn test_upper_edge_is_source_for_every_whole_height() {
        for h in (20..=2000).step_by(20) {
            let h = f64::from(h);
            assert_eq!(classify(h * 11.0 / 20.0, h), DropZone::Source, "h = {}", h);
            assert_eq!(classify(h * 7.0 / 20.0, h), DropZone::Target, "h = {}", h);
        }
    }

    #[test]
    fn test_total_over_the_window() {
        let h = 1000.0;
        let mut targets = 0;
        for y in 0..=1000 {
            if classify(f64::from(y), h) == DropZone::Target {
                targets += 1;
            }
        }
        // y in 350..550
        assert_eq!(targets, 200);
    }

    #[test]
    fn test_degenerate_geometry_falls_back_to_source() {
        assert_eq!(classify(10.0, 0.0), DropZone::Source);
        assert_eq!(classify(10.0, -5.0), DropZone::Source);
        assert_eq!(classify(f64::NAN, 100.0), DropZone::Source);
        assert_eq!(classify(-1.0, 100.0), DropZone::Source);
        assert_eq!(classify(150.0, 100.0), DropZone::Source);
    }
}
