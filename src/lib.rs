mod detector;
mod draw;
mod error;
pub mod ffi;
mod frame;
mod metadata;
mod network;
mod records;

pub use detector::{BoundingBox, DetectOptions, Detection, Detector, DEFAULT_LABELS};
pub use draw::draw_detections;
pub use error::DetectorError;
#[cfg(feature = "ffi")]
pub use frame::NativeImage;
pub use frame::ImageFrame;
pub use metadata::Metadata;
#[cfg(all(feature = "ffi", darknet_gpu))]
pub use network::set_gpu_device;
pub use network::Network;
pub use records::{to_records, DetectionRecord};

#[cfg(feature = "ffi")]
pub(crate) fn path_to_cstring(path: &std::path::Path) -> Result<std::ffi::CString, DetectorError> {
    std::ffi::CString::new(path.to_string_lossy().as_bytes()).map_err(|_| {
        DetectorError::FileError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path contains an interior nul byte",
        ))
    })
}
