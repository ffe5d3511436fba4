// Publishes `noisegen.h` to $OUT_DIR for downstream build systems.
// Regenerated with `cbindgen` when it is on PATH, else the checked-in
// `include/noisegen.h` is copied as-is.

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/noisegen.h");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let header = PathBuf::from(env::var("OUT_DIR").unwrap()).join("noisegen.h");

    let generated = Command::new("cbindgen")
        .args(["--crate", "noisegen-ffi", "--lang", "C", "--output"])
        .arg(&header)
        .current_dir(&crate_dir)
        .status()
        .is_ok_and(|s| s.success());
    if generated {
        return;
    }

    if let Err(e) = fs::copy(crate_dir.join("include").join("noisegen.h"), &header) {
        println!("cargo:warning=noisegen-ffi: no header published ({e})");
    }
}
