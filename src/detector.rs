//! The detection pipeline: marshal an image in, run the forward pass, copy
//! detections out, rank and filter them.
//!
//! Native memory is handled with scoped guards: the detection array that
//! `get_network_boxes` hands back is wrapped in a type whose drop releases
//! it, so the array is freed on every exit path and nothing copied out of
//! it can reference native memory afterwards.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::DetectorError;
use crate::frame::ImageFrame;
use crate::metadata::Metadata;
use crate::network::Network;
use crate::records::{to_records, DetectionRecord};

/// The labels kept by default after ranking.
pub const DEFAULT_LABELS: [&str; 5] = ["person", "car", "motorbike", "bus", "truck"];

/// A bounding box in center form: center coordinates plus width and height,
/// in the pixel units of the network's resized input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
}

/// One ranked detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub label: String,
    pub score: f32,
    pub bbox: BoundingBox,
}

/// Thresholds and filtering applied by [`Detector::detect_with_options`].
///
/// The defaults reproduce the stock pipeline: score threshold 0.25,
/// hierarchy threshold 0.5, class-aware NMS at IoU 0.45, and the
/// five-label filter in [`DEFAULT_LABELS`]. Set `label_filter` to `None`
/// to keep every class.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    pub threshold: f32,
    pub hier_threshold: f32,
    /// NMS IoU threshold; a non-positive value disables NMS.
    pub nms: f32,
    pub label_filter: Option<Vec<String>>,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            hier_threshold: 0.5,
            nms: 0.45,
            label_filter: Some(DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()),
        }
    }
}

/// An initialized network plus its class metadata.
pub struct Detector {
    net: Network,
    meta: Metadata,
}

impl Detector {
    /// Open a detector from a network config file, a weights file and a
    /// metadata file.
    ///
    /// Each path is checked before anything is loaded; a missing file fails
    /// immediately with an error naming the absolute path.
    pub fn open<P: AsRef<Path>>(config: P, weights: P, metadata: P) -> Result<Self, DetectorError> {
        let config = config.as_ref();
        let weights = weights.as_ref();
        let metadata = metadata.as_ref();

        if !config.exists() {
            return Err(DetectorError::InvalidConfigPath(absolute(config)));
        }
        if !weights.exists() {
            return Err(DetectorError::InvalidWeightsPath(absolute(weights)));
        }
        if !metadata.exists() {
            return Err(DetectorError::InvalidMetadataPath(absolute(metadata)));
        }

        let net = Network::load(config, weights)?;
        let meta = Metadata::load(metadata)?;
        debug!(
            classes = meta.classes(),
            alt_names = meta.has_alt_names(),
            "network loaded"
        );
        Ok(Self { net, meta })
    }

    /// The loaded network.
    pub fn network(&self) -> &Network {
        &self.net
    }

    /// The loaded class metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// Run detection with the default options.
    pub fn detect(&mut self, frame: &ImageFrame) -> Result<Vec<Detection>, DetectorError> {
        self.detect_with_options(frame, &DetectOptions::default())
    }

    /// Run detection with the default options and a custom score threshold.
    pub fn detect_with_threshold(
        &mut self,
        frame: &ImageFrame,
        threshold: f32,
    ) -> Result<Vec<Detection>, DetectorError> {
        let options = DetectOptions {
            threshold,
            ..DetectOptions::default()
        };
        self.detect_with_options(frame, &options)
    }

    /// Run the full pipeline: forward pass, box retrieval, NMS, ranking and
    /// label filtering.
    ///
    /// The result is sorted by descending score; the label filter runs after
    /// the sort, so the survivors stay in score order.
    pub fn detect_with_options(
        &mut self,
        frame: &ImageFrame,
        options: &DetectOptions,
    ) -> Result<Vec<Detection>, DetectorError> {
        #[cfg(feature = "ffi")]
        {
            let mut planar = crate::frame::PlanarBuffer::from_frame(frame);
            self.detect_raw(planar.as_raw(), options)
        }

        #[cfg(not(feature = "ffi"))]
        {
            let _ = (frame, options);
            Err(DetectorError::FfiDisabled)
        }
    }

    /// Run detection on an image owned by the native engine.
    #[cfg(feature = "ffi")]
    pub fn detect_native(
        &mut self,
        image: &crate::frame::NativeImage,
        options: &DetectOptions,
    ) -> Result<Vec<Detection>, DetectorError> {
        self.detect_raw(image.raw(), options)
    }

    /// Detection and record formatting combined: the frame's own dimensions
    /// bound the clipped corner coordinates.
    pub fn detect_records(
        &mut self,
        frame: &ImageFrame,
        threshold: f32,
    ) -> Result<Vec<DetectionRecord>, DetectorError> {
        let detections = self.detect_with_threshold(frame, threshold)?;
        Ok(to_records(&detections, frame.width(), frame.height()))
    }

    /// Run the forward pass and return every class score, best first.
    pub fn classify(&mut self, frame: &ImageFrame) -> Result<Vec<(String, f32)>, DetectorError> {
        #[cfg(feature = "ffi")]
        {
            use crate::ffi::bindings;

            let mut planar = crate::frame::PlanarBuffer::from_frame(frame);
            let raw = planar.as_raw();
            let out = unsafe { bindings::network_predict_image(self.net.as_ptr(), raw) };
            if out.is_null() {
                return Err(DetectorError::NativeCall("network_predict_image returned null"));
            }
            let scores = unsafe { std::slice::from_raw_parts(out, self.meta.classes()) };
            let mut ranked: Vec<(String, f32)> = scores
                .iter()
                .enumerate()
                .map(|(i, &score)| (self.meta.label(i).to_owned(), score))
                .collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            Ok(ranked)
        }

        #[cfg(not(feature = "ffi"))]
        {
            let _ = frame;
            Err(DetectorError::FfiDisabled)
        }
    }

    #[cfg(feature = "ffi")]
    fn detect_raw(
        &mut self,
        image: crate::ffi::RawImage,
        options: &DetectOptions,
    ) -> Result<Vec<Detection>, DetectorError> {
        use crate::ffi::bindings;

        // Forward pass; the return value is discarded, the side effect
        // populates the network's detection buffers.
        unsafe { bindings::network_predict_image(self.net.as_ptr(), image) };

        let mut count: std::os::raw::c_int = 0;
        let ptr = unsafe {
            bindings::get_network_boxes(
                self.net.as_ptr(),
                image.w,
                image.h,
                options.threshold,
                options.hier_threshold,
                std::ptr::null_mut(),
                0,
                &mut count,
                0,
            )
        };
        if ptr.is_null() && count > 0 {
            return Err(DetectorError::NativeCall("get_network_boxes returned null"));
        }
        let dets = Detections { ptr, count };

        let classes = self.meta.classes() as std::os::raw::c_int;
        if options.nms > 0.0 && count > 0 {
            unsafe { bindings::do_nms_sort(dets.ptr, count, classes, options.nms) };
        }

        let mut hits = Vec::new();
        for det in dets.as_slice() {
            if det.prob.is_null() {
                continue;
            }
            let probs =
                unsafe { std::slice::from_raw_parts(det.prob, det.classes.max(0) as usize) };
            for (i, &p) in probs.iter().enumerate().take(self.meta.classes()) {
                if p > 0.0 {
                    hits.push(Detection {
                        label: self.meta.label(i).to_owned(),
                        score: p,
                        bbox: BoundingBox {
                            cx: det.bbox.x,
                            cy: det.bbox.y,
                            width: det.bbox.w,
                            height: det.bbox.h,
                        },
                    });
                }
            }
        }
        drop(dets);

        Ok(rank(hits, options.label_filter.as_deref()))
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("classes", &self.meta.classes())
            .finish_non_exhaustive()
    }
}

/// Sort by descending score, then drop everything outside the allow-list.
///
/// The filter runs after the sort so the kept entries remain in score
/// order; equal scores keep their relative order.
#[cfg_attr(not(feature = "ffi"), allow(dead_code))]
pub(crate) fn rank(mut detections: Vec<Detection>, filter: Option<&[String]>) -> Vec<Detection> {
    detections.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(allow) = filter {
        detections.retain(|d| allow.iter().any(|label| label == &d.label));
    }
    detections
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Scoped ownership of the native detection array.
///
/// `prob` pointers inside the records point into the same allocation, so
/// everything must be copied out before this guard drops.
#[cfg(feature = "ffi")]
struct Detections {
    ptr: *mut crate::ffi::RawDetection,
    count: std::os::raw::c_int,
}

#[cfg(feature = "ffi")]
impl Detections {
    fn as_slice(&self) -> &[crate::ffi::RawDetection] {
        if self.ptr.is_null() || self.count <= 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.ptr, self.count as usize) }
        }
    }
}

#[cfg(feature = "ffi")]
impl Drop for Detections {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { crate::ffi::bindings::free_detections(self.ptr, self.count) };
        }
    }
}
