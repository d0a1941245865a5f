//! Bounding-box rendering.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::records::DetectionRecord;

/// Draw one unfilled rectangle per record onto the caller's buffer.
///
/// The buffer is mutated in place. People draw green; every other label
/// draws red, which means `(255, 0, 0)` for an RGB buffer and
/// `(0, 0, 255)` when the caller says the buffer is packed BGR.
/// Rectangles with no positive extent are skipped.
pub fn draw_detections(image: &mut RgbImage, records: &[DetectionRecord], bgr: bool) {
    for record in records {
        let color = if record.label == "person" {
            Rgb([0, 255, 0])
        } else if bgr {
            Rgb([0, 0, 255])
        } else {
            Rgb([255, 0, 0])
        };

        let w = record.bottom_right_x - record.top_left_x;
        let h = record.bottom_right_y - record.top_left_y;
        if w <= 0 || h <= 0 {
            continue;
        }
        // Both corners are on the outline, so the rect spans w + 1 columns.
        draw_hollow_rect_mut(
            image,
            Rect::at(record.top_left_x, record.top_left_y).of_size(w as u32 + 1, h as u32 + 1),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, x1: i32, y1: i32, x2: i32, y2: i32) -> DetectionRecord {
        DetectionRecord {
            label: label.to_string(),
            score: 0.9,
            top_left_x: x1,
            top_left_y: y1,
            bottom_right_x: x2,
            bottom_right_y: y2,
        }
    }

    #[test]
    fn person_draws_green() {
        let mut image = RgbImage::new(40, 40);
        draw_detections(&mut image, &[record("person", 10, 10, 20, 20)], false);
        assert_eq!(*image.get_pixel(10, 10), Rgb([0, 255, 0]));
        assert_eq!(*image.get_pixel(15, 10), Rgb([0, 255, 0]));
        // Interior stays untouched.
        assert_eq!(*image.get_pixel(15, 15), Rgb([0, 0, 0]));
    }

    #[test]
    fn other_labels_follow_the_channel_order_flag() {
        let mut rgb = RgbImage::new(40, 40);
        draw_detections(&mut rgb, &[record("car", 5, 5, 15, 15)], false);
        assert_eq!(*rgb.get_pixel(5, 5), Rgb([255, 0, 0]));

        let mut bgr = RgbImage::new(40, 40);
        draw_detections(&mut bgr, &[record("car", 5, 5, 15, 15)], true);
        assert_eq!(*bgr.get_pixel(5, 5), Rgb([0, 0, 255]));
    }

    #[test]
    fn person_is_green_regardless_of_channel_order() {
        let mut bgr = RgbImage::new(40, 40);
        draw_detections(&mut bgr, &[record("person", 5, 5, 15, 15)], true);
        assert_eq!(*bgr.get_pixel(5, 5), Rgb([0, 255, 0]));
    }

    #[test]
    fn degenerate_rectangles_are_skipped() {
        let mut image = RgbImage::new(40, 40);
        draw_detections(
            &mut image,
            &[record("car", 20, 20, 20, 30), record("bus", 20, 20, 10, 30)],
            false,
        );
        assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn rectangle_outline_covers_all_four_edges() {
        let mut image = RgbImage::new(40, 40);
        draw_detections(&mut image, &[record("car", 10, 12, 30, 24)], false);
        let red = Rgb([255, 0, 0]);
        assert_eq!(*image.get_pixel(10, 12), red); // top-left
        assert_eq!(*image.get_pixel(30, 12), red); // top-right
        assert_eq!(*image.get_pixel(10, 24), red); // bottom-left
        assert_eq!(*image.get_pixel(30, 24), red); // bottom-right
        assert_eq!(*image.get_pixel(20, 12), red); // top edge
        assert_eq!(*image.get_pixel(10, 18), red); // left edge
    }
}
