//! Wrapper around the engine's opaque network handle.
//!
//! The handle comes out of `load_network_custom` with batch size 1 and is
//! used for every prediction afterwards. The engine does not document the
//! handle as thread-safe, so the wrapper holds a raw pointer and is
//! deliberately neither `Send` nor `Sync`; callers that want detection off
//! the main thread own that coordination. The bound surface exposes no
//! release call for the network, so the handle lives as long as the
//! wrapper.

use std::path::Path;

use crate::error::DetectorError;

/// A loaded darknet network.
pub struct Network {
    #[cfg(feature = "ffi")]
    handle: std::ptr::NonNull<std::os::raw::c_void>,
}

impl Network {
    /// Load a network from a config file and a weights file, batch size 1.
    ///
    /// The paths are assumed to exist; `Detector::open` validates them
    /// first. A null handle from the loader becomes `NetworkLoad`.
    pub fn load(config: &Path, weights: &Path) -> Result<Self, DetectorError> {
        #[cfg(feature = "ffi")]
        {
            let c_config = crate::path_to_cstring(config)?;
            let c_weights = crate::path_to_cstring(weights)?;
            let handle = unsafe {
                crate::ffi::bindings::load_network_custom(c_config.as_ptr(), c_weights.as_ptr(), 0, 1)
            };
            let handle = std::ptr::NonNull::new(handle).ok_or(DetectorError::NetworkLoad)?;
            Ok(Self { handle })
        }

        #[cfg(not(feature = "ffi"))]
        {
            let _ = (config, weights);
            Err(DetectorError::FfiDisabled)
        }
    }

    /// Width of the network's input layer in pixels.
    pub fn input_width(&self) -> i32 {
        #[cfg(feature = "ffi")]
        {
            unsafe { crate::ffi::bindings::network_width(self.handle.as_ptr()) }
        }

        #[cfg(not(feature = "ffi"))]
        {
            0
        }
    }

    /// Height of the network's input layer in pixels.
    pub fn input_height(&self) -> i32 {
        #[cfg(feature = "ffi")]
        {
            unsafe { crate::ffi::bindings::network_height(self.handle.as_ptr()) }
        }

        #[cfg(not(feature = "ffi"))]
        {
            0
        }
    }

    #[cfg(feature = "ffi")]
    pub(crate) fn as_ptr(&self) -> *mut std::os::raw::c_void {
        self.handle.as_ptr()
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network").finish_non_exhaustive()
    }
}

/// Select the CUDA device used for subsequent network loads and predictions.
///
/// Only present when build.rs linked the GPU-capable library variant.
#[cfg(all(feature = "ffi", darknet_gpu))]
pub fn set_gpu_device(index: i32) {
    unsafe { crate::ffi::bindings::cuda_set_device(index) };
}
