#[cfg(test)]
mod tests {
    use crate::capture::annotator::{annotate, text_placement, TEXT_COLOR, TEXT_MARGIN};
    use crate::capture::font;
    use image::{Rgb, RgbImage};

    const STAMP: &str = "20240101_120000_3";

    fn lit_bounds(frame: &RgbImage) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, pixel) in frame.enumerate_pixels() {
            if *pixel == TEXT_COLOR {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((min_x, min_y, max_x, max_y)) => (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)),
                });
            }
        }
        bounds
    }

    #[test]
    fn test_stamp_is_anchored_bottom_right_with_margin() {
        let mut frame = RgbImage::new(640, 480);
        let placement = annotate(&mut frame, STAMP);

        assert!(placement.x >= 0 && placement.y >= 0);
        assert_eq!(placement.right(), 640 - TEXT_MARGIN as i64);
        assert_eq!(placement.bottom(), 480 - TEXT_MARGIN as i64);

        let (min_x, min_y, max_x, max_y) = lit_bounds(&frame).expect("stamp should draw pixels");
        assert!(min_x as i64 >= placement.x);
        assert!(min_y as i64 >= placement.y);
        // The last glyph is a '3' whose right column is lit, and the underscores
        // reach the bottom row, so the drawn pixels touch the margin exactly.
        assert_eq!(max_x, 640 - TEXT_MARGIN - 1);
        assert_eq!(max_y, 480 - TEXT_MARGIN - 1);
    }

    #[test]
    fn test_placement_depends_only_on_dimensions_and_text() {
        let first = text_placement(1920, 1080, STAMP);
        let second = text_placement(1920, 1080, STAMP);
        assert_eq!(first, second);

        let (width, height) = font::text_size(STAMP, crate::capture::annotator::TEXT_SCALE);
        assert_eq!(first.width, width);
        assert_eq!(first.height, height);
        assert_eq!(first.x, 1920 - 10 - width as i64);
        assert_eq!(first.y, 1080 - 10 - height as i64);
    }

    #[test]
    fn test_annotate_leaves_rest_of_frame_untouched() {
        let background = Rgb([12, 34, 56]);
        let mut frame = RgbImage::from_pixel(1280, 720, background);
        let placement = annotate(&mut frame, STAMP);

        for (x, y, pixel) in frame.enumerate_pixels() {
            let inside = (x as i64) >= placement.x
                && (x as i64) < placement.right()
                && (y as i64) >= placement.y
                && (y as i64) < placement.bottom();
            if !inside {
                assert_eq!(*pixel, background, "pixel ({}, {}) outside the stamp changed", x, y);
            }
        }
    }

    #[test]
    fn test_oversized_text_is_clipped_to_frame() {
        let mut frame = RgbImage::new(40, 20);
        let placement = annotate(&mut frame, STAMP);

        assert!(placement.x < 0);
        assert!(placement.y < 0);
        assert!(lit_bounds(&frame).is_some());
    }

    #[test]
    fn test_text_size_counts_glyph_spacing() {
        assert_eq!(font::text_size("", 4), (0, 0));
        assert_eq!(font::text_size("1", 1), (5, 7));
        assert_eq!(font::text_size("12", 2), (22, 14));
    }

    #[test]
    fn test_unknown_characters_render_as_box() {
        let boxed: Vec<(u32, u32)> = font::lit_pixels("?").collect();
        assert!(boxed.contains(&(0, 0)));
        assert!(boxed.contains(&(4, 6)));
        assert!(!boxed.contains(&(2, 3)));
    }
}
