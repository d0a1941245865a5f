//! Foreign declarations for the darknet shared library.
//!
//! One declaration per exported symbol, matching the engine's C signatures.
//! The library variant (GPU or CPU-only) is selected by `build.rs`; the
//! `cuda_set_device` symbol only exists in GPU-capable builds and is gated
//! on the `darknet_gpu` cfg that build.rs emits alongside the link line.
//!
//! Every call into this module is unsafe. Ownership rules the callers must
//! uphold:
//! - `get_network_boxes` returns an array that must be released with
//!   `free_detections`, including the per-detection `prob` arrays.
//! - images produced by `make_image`, `load_image_color` and
//!   `letterbox_image` must be released with `free_image`.
//! - an image built around a caller-owned buffer must NOT be passed to
//!   `free_image`; the buffer outlives the calls that read it.

#![allow(dead_code)]

use std::os::raw::{c_char, c_float, c_int, c_void};

use super::types::{RawDetection, RawImage, RawMetadata};

extern "C" {
    pub fn network_width(net: *mut c_void) -> c_int;
    pub fn network_height(net: *mut c_void) -> c_int;

    pub fn network_predict(net: *mut c_void, input: *mut c_float) -> *mut c_float;

    #[cfg(darknet_gpu)]
    pub fn cuda_set_device(n: c_int);

    pub fn make_image(w: c_int, h: c_int, c: c_int) -> RawImage;

    pub fn get_network_boxes(
        net: *mut c_void,
        w: c_int,
        h: c_int,
        thresh: c_float,
        hier: c_float,
        map: *mut c_int,
        relative: c_int,
        num: *mut c_int,
        letter: c_int,
    ) -> *mut RawDetection;

    pub fn make_network_boxes(net: *mut c_void) -> *mut RawDetection;

    pub fn free_detections(dets: *mut RawDetection, n: c_int);

    pub fn free_ptrs(ptrs: *mut *mut c_void, n: c_int);

    pub fn reset_rnn(net: *mut c_void);

    pub fn load_network(cfg: *const c_char, weights: *const c_char, clear: c_int) -> *mut c_void;

    pub fn load_network_custom(
        cfg: *const c_char,
        weights: *const c_char,
        clear: c_int,
        batch: c_int,
    ) -> *mut c_void;

    pub fn do_nms_obj(dets: *mut RawDetection, total: c_int, classes: c_int, thresh: c_float);

    pub fn do_nms_sort(dets: *mut RawDetection, total: c_int, classes: c_int, thresh: c_float);

    pub fn free_image(im: RawImage);

    pub fn letterbox_image(im: RawImage, w: c_int, h: c_int) -> RawImage;

    pub fn get_metadata(file: *const c_char) -> RawMetadata;

    pub fn load_image_color(filename: *const c_char, w: c_int, h: c_int) -> RawImage;

    pub fn rgbgr_image(im: RawImage);

    pub fn network_predict_image(net: *mut c_void, im: RawImage) -> *mut c_float;
}
