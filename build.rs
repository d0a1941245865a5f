use std::env;
use std::path::{Path, PathBuf};

/// Candidate file names for a shared library stem on the current platform.
fn library_candidates(dir: &Path, stem: &str) -> Vec<PathBuf> {
    vec![
        dir.join(format!("lib{stem}.so")),
        dir.join(format!("lib{stem}.dylib")),
        dir.join(format!("{stem}.dll")),
    ]
}

fn library_present(dir: &Path, stem: &str) -> bool {
    library_candidates(dir, stem).iter().any(|p| p.exists())
}

/// A CPU-only run is requested through the environment: either an explicit
/// FORCE_CPU flag, or a negative CUDA device index.
fn cpu_forced() -> bool {
    if let Ok(flag) = env::var("FORCE_CPU") {
        let flag = flag.to_lowercase();
        if matches!(flag.as_str(), "1" | "true" | "yes" | "on") {
            return true;
        }
        println!("cargo:warning=FORCE_CPU value '{flag}' not forcing CPU mode");
    }
    if let Ok(devices) = env::var("CUDA_VISIBLE_DEVICES") {
        if let Ok(index) = devices.trim().parse::<i32>() {
            if index < 0 {
                return true;
            }
        }
    }
    false
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DARKNET_LIB_DIR");
    println!("cargo:rerun-if-env-changed=FORCE_CPU");
    println!("cargo:rerun-if-env-changed=CUDA_VISIBLE_DEVICES");
    println!("cargo:rustc-check-cfg=cfg(darknet_gpu)");

    if env::var_os("CARGO_FEATURE_FFI").is_none() {
        return;
    }

    let lib_dir = env::var("DARKNET_LIB_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"))
        });

    println!("cargo:rustc-link-search=native={}", lib_dir.display());

    let want_gpu = !cpu_forced();
    if want_gpu && library_present(&lib_dir, "darknet") {
        println!("cargo:rustc-cfg=darknet_gpu");
        println!("cargo:rustc-link-lib=dylib=darknet");
    } else if library_present(&lib_dir, "darknet_nogpu") {
        if want_gpu {
            println!("cargo:warning=GPU-capable darknet library not found in {}; CPU-only mode", lib_dir.display());
        }
        println!("cargo:rustc-link-lib=dylib=darknet_nogpu");
    } else {
        println!(
            "cargo:warning=Environment indicated a CPU run, but no darknet_nogpu library was found in {}. Trying a GPU run anyway.",
            lib_dir.display()
        );
        println!("cargo:rustc-link-lib=dylib=darknet");
    }
}
