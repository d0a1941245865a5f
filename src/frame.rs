//! Image marshalling between caller-owned pixel buffers and the engine's
//! planar float form.
//!
//! The engine reads images as plane-major float32 normalized to [0, 1].
//! `PlanarBuffer` performs that conversion once and keeps ownership of the
//! float data for as long as the native side needs to read it; the `RawImage`
//! handed across the boundary only borrows the buffer, so nothing is copied
//! into native memory and nothing on the native side must be freed.

use image::RgbImage;

use crate::error::DetectorError;

/// A dense 8-bit image in row-major height x width x channel order.
///
/// RGB or BGR, as the caller prefers; the engine does not care, but the
/// renderer's color choice does (see [`crate::draw_detections`]).
#[derive(Debug, Clone)]
pub struct ImageFrame {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<u8>,
}

impl ImageFrame {
    /// Wrap a flat interleaved pixel buffer.
    ///
    /// Fails if the buffer length does not match the declared dimensions.
    pub fn new(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self, DetectorError> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(DetectorError::InvalidImage {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Build a frame from an `image` crate RGB buffer.
    pub fn from_rgb(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: 3,
            data: image.as_raw().clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The engine's image form: one float plane per channel, values in [0, 1].
///
/// Owns its buffer. The raw view handed to the engine borrows it, so a
/// `PlanarBuffer` must stay alive across the native call that reads it.
#[derive(Debug)]
#[cfg_attr(not(feature = "ffi"), allow(dead_code))]
pub(crate) struct PlanarBuffer {
    width: i32,
    height: i32,
    channels: i32,
    data: Vec<f32>,
}

impl PlanarBuffer {
    /// Convert an interleaved 8-bit frame into plane-major normalized floats.
    #[cfg_attr(not(feature = "ffi"), allow(dead_code))]
    pub(crate) fn from_frame(frame: &ImageFrame) -> Self {
        let (w, h, c) = (
            frame.width as usize,
            frame.height as usize,
            frame.channels as usize,
        );
        let plane = w * h;
        let mut data = vec![0f32; plane * c];
        let pixels = frame.data();
        for ch in 0..c {
            let dst = &mut data[ch * plane..(ch + 1) * plane];
            for (i, value) in dst.iter_mut().enumerate() {
                *value = f32::from(pixels[i * c + ch]) / 255.0;
            }
        }
        Self {
            width: frame.width as i32,
            height: frame.height as i32,
            channels: frame.channels as i32,
            data,
        }
    }

    #[cfg(test)]
    pub(crate) fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw view over the owned buffer. Valid only while `self` lives; must
    /// never be passed to the engine's image release call.
    #[cfg(feature = "ffi")]
    pub(crate) fn as_raw(&mut self) -> crate::ffi::RawImage {
        crate::ffi::RawImage {
            w: self.width,
            h: self.height,
            c: self.channels,
            data: self.data.as_mut_ptr(),
        }
    }
}

/// An image allocated and owned by the native engine.
///
/// Released with the engine's `free_image` on drop.
#[cfg(feature = "ffi")]
pub struct NativeImage {
    raw: crate::ffi::RawImage,
}

#[cfg(feature = "ffi")]
impl NativeImage {
    /// Allocate an empty native image.
    pub fn alloc(width: i32, height: i32, channels: i32) -> Result<Self, DetectorError> {
        let raw = unsafe { crate::ffi::bindings::make_image(width, height, channels) };
        if raw.data.is_null() {
            return Err(DetectorError::NativeCall("make_image returned no buffer"));
        }
        Ok(Self { raw })
    }

    /// Load an image file through the engine's own reader, optionally
    /// resized (0 keeps the source dimension).
    pub fn open(path: &std::path::Path, width: i32, height: i32) -> Result<Self, DetectorError> {
        let c_path = crate::path_to_cstring(path)?;
        let raw = unsafe { crate::ffi::bindings::load_image_color(c_path.as_ptr(), width, height) };
        if raw.data.is_null() {
            return Err(DetectorError::NativeCall("load_image_color failed"));
        }
        Ok(Self { raw })
    }

    /// Letterbox into a new native image of the given dimensions.
    pub fn letterboxed(&self, width: i32, height: i32) -> Result<Self, DetectorError> {
        let raw = unsafe { crate::ffi::bindings::letterbox_image(self.raw, width, height) };
        if raw.data.is_null() {
            return Err(DetectorError::NativeCall("letterbox_image failed"));
        }
        Ok(Self { raw })
    }

    /// Swap the red and blue planes in place.
    pub fn swap_red_blue(&mut self) {
        unsafe { crate::ffi::bindings::rgbgr_image(self.raw) };
    }

    pub fn width(&self) -> i32 {
        self.raw.w
    }

    pub fn height(&self) -> i32 {
        self.raw.h
    }

    pub(crate) fn raw(&self) -> crate::ffi::RawImage {
        self.raw
    }
}

#[cfg(feature = "ffi")]
impl Drop for NativeImage {
    fn drop(&mut self) {
        unsafe { crate::ffi::bindings::free_image(self.raw) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rejects_short_buffer() {
        let result = ImageFrame::new(4, 4, 3, vec![0u8; 10]);
        match result {
            Err(DetectorError::InvalidImage {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 48);
                assert_eq!(actual, 10);
            }
            _ => panic!("Expected InvalidImage for a short buffer"),
        }
    }

    #[test]
    fn planar_layout_and_scaling() {
        // 2x2 RGB frame with one saturated channel per corner.
        let data = vec![
            255, 0, 0, /* (0,0) red */
            0, 255, 0, /* (1,0) green */
            0, 0, 255, /* (0,1) blue */
            51, 102, 153, /* (1,1) mixed */
        ];
        let frame = ImageFrame::new(2, 2, 3, data).unwrap();
        let planar = PlanarBuffer::from_frame(&frame);
        let d = planar.data();
        assert_eq!(d.len(), 12);
        // Red plane, row-major.
        assert_eq!(&d[0..4], &[1.0, 0.0, 0.0, 0.2]);
        // Green plane.
        assert_eq!(&d[4..8], &[0.0, 1.0, 0.0, 0.4]);
        // Blue plane.
        assert_eq!(&d[8..12], &[0.0, 0.0, 1.0, 0.6]);
    }

    #[test]
    fn from_rgb_matches_manual_frame() {
        let mut image = RgbImage::new(3, 2);
        image.put_pixel(2, 1, image::Rgb([9, 8, 7]));
        let frame = ImageFrame::from_rgb(&image);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        let idx = ((1 * 3) + 2) * 3;
        assert_eq!(&frame.data()[idx..idx + 3], &[9, 8, 7]);
    }
}
