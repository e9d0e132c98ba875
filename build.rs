use std::env;

// Only the `cblas` backend links a native library
fn link_blas() {
    println!("cargo:rerun-if-env-changed=SGEMM_BENCH_BLAS_LIB");

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    match env::var("SGEMM_BENCH_BLAS_LIB") {
        Ok(lib) if !lib.is_empty() => println!("cargo:rustc-link-lib={lib}"),
        _ if target_os == "macos" => println!("cargo:rustc-link-lib=framework=Accelerate"),
        _ => println!("cargo:rustc-link-lib=openblas"),
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if env::var_os("CARGO_FEATURE_CBLAS").is_some() {
        link_blas();
    }
}
