fn main() {
    // Only the `link` feature pulls in the real libopus.
    if std::env::var_os("CARGO_FEATURE_LINK").is_some() {
        if let Some(dir) = std::env::var_os("OPUS_LIB_DIR") {
            println!(
                "cargo:rustc-link-search=native={}",
                std::path::Path::new(&dir).display()
            );
        }
        println!("cargo:rustc-link-lib=opus");
    }

    println!("cargo:rerun-if-env-changed=OPUS_LIB_DIR");
    println!("cargo:rerun-if-changed=build.rs");
}
