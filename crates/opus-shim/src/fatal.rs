//! `celt_fatal` for bare-metal libopus builds.
//!
//! libopus' assertion failures call `celt_fatal`, whose stock definition
//! prints through the C standard library and calls `abort()`. Neither is
//! available on `target_os = "none"`, so the Rust panic handler takes over.

use core::ffi::{c_char, CStr};

/// Turn a libopus assertion failure into a Rust panic.
///
/// # Panics
///
/// Always.
///
/// # Safety
///
/// `str_` and `file` must be null or valid NUL-terminated C strings.
#[cfg(target_os = "none")]
#[no_mangle]
#[allow(clippy::panic)] // libopus cannot continue after celt_fatal
pub unsafe extern "C" fn celt_fatal(
    str_: *const c_char,
    file: *const c_char,
    line: core::ffi::c_int,
) -> ! {
    // SAFETY: null-checked; validity is the caller's contract
    let message = unsafe { lossy(str_) };
    // SAFETY: as above
    let file = unsafe { lossy(file) };
    panic!("celt_fatal: {}: {}: {}", message, file, line);
}

/// # Safety
///
/// `ptr` must be null or a valid NUL-terminated C string.
unsafe fn lossy<'a>(ptr: *const c_char) -> &'a str {
    if ptr.is_null() {
        return "<null>";
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract
    let s = unsafe { CStr::from_ptr(ptr) };
    s.to_str().unwrap_or("<invalid utf-8>")
}
