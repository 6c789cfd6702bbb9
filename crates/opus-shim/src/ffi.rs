//! Linked libopus boundary.
//!
//! Only the calls needed to size-check and initialise decoder storage are
//! declared here; decoding itself goes through the caller's own bindings,
//! which take the same [`OpusDecoder`] pointer.
//!
//! `init_decoder` refuses to hand storage to libopus until the library has
//! confirmed the decoder fits. Calling `opus_decoder_init` directly skips
//! that check and is only sound after [`verify_linked`] succeeded.

use core::ffi::{c_char, c_int, CStr};

use crate::error::ShimError;
use crate::fit::{check_fits, check_version, verify_with};
use crate::storage::{ChannelMode, OpusDecoder};

/// No error.
pub const OPUS_OK: c_int = 0;
/// One or more invalid or out-of-range arguments.
pub const OPUS_BAD_ARG: c_int = -1;
/// Memory allocation failed (every allocation under [`crate::AllocHooks::NO_HEAP`]).
pub const OPUS_ALLOC_FAIL: c_int = -7;

extern "C" {
    /// Bytes an `OpusDecoder` with `channels` channels occupies.
    pub fn opus_decoder_get_size(channels: c_int) -> c_int;

    /// Initialise a decoder in caller-provided memory.
    pub fn opus_decoder_init(st: *mut OpusDecoder, fs: i32, channels: c_int) -> c_int;

    /// Static, NUL-terminated version string, e.g. `"libopus 1.5.2"`.
    pub fn opus_get_version_string() -> *const c_char;

    /// Static, NUL-terminated description of an error code.
    pub fn opus_strerror(error: c_int) -> *const c_char;
}

/// Convert a static C string from libopus, mapping null or non-UTF-8 to
/// `fallback`.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that lives for
/// the rest of the program.
unsafe fn static_str(ptr: *const c_char, fallback: &'static str) -> &'static str {
    if ptr.is_null() {
        return fallback;
    }
    // SAFETY: non-null and static per the caller's contract
    let s = unsafe { CStr::from_ptr(ptr) };
    s.to_str().unwrap_or(fallback)
}

/// Version string of the linked libopus.
#[must_use]
pub fn linked_version() -> &'static str {
    // SAFETY: opus_get_version_string returns a pointer to a string literal
    unsafe { static_str(opus_get_version_string(), "") }
}

/// libopus' message for `code`.
#[must_use]
pub fn error_message(code: c_int) -> &'static str {
    // SAFETY: opus_strerror accepts any int and returns a string literal
    unsafe { static_str(opus_strerror(code), "Unknown error") }
}

/// Size the linked libopus reports for `mode`.
///
/// # Errors
///
/// Returns [`ShimError::InvalidSize`] when libopus rejects the channel count.
pub fn linked_size(mode: ChannelMode) -> Result<usize, ShimError> {
    // SAFETY: opus_decoder_get_size only inspects its argument
    let reported = unsafe { opus_decoder_get_size(c_int::from(mode.channels())) };
    match usize::try_from(reported) {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ShimError::InvalidSize { reported }),
    }
}

/// Check the linked libopus against the pinned release and sizes.
///
/// # Errors
///
/// [`ShimError::VersionMismatch`] for a different release, otherwise the
/// first failing size check.
pub fn verify_linked() -> Result<(), ShimError> {
    check_version(linked_version())?;
    verify_with(|channels| {
        // SAFETY: opus_decoder_get_size only inspects its argument
        unsafe { opus_decoder_get_size(c_int::from(channels)) }
    })
}

/// Initialise a decoder for `sample_rate` Hz in `storage`.
///
/// The fit is checked against the linked library first; libopus only sees
/// `storage` when it is large enough. The version pin is left to
/// [`verify_linked`].
///
/// # Errors
///
/// - [`ShimError::Unsupported`] / [`ShimError::TooSmall`] /
///   [`ShimError::InvalidSize`] from the fit check.
/// - [`ShimError::Init`] with libopus' code, e.g. [`OPUS_BAD_ARG`] for a
///   sample rate other than 8, 12, 16, 24 or 48 kHz.
pub fn init_decoder(
    storage: &mut OpusDecoder,
    sample_rate: i32,
    mode: ChannelMode,
) -> Result<(), ShimError> {
    if !mode.is_supported() {
        return Err(ShimError::Unsupported { mode });
    }
    check_fits(mode, linked_size(mode)?)?;
    // SAFETY: storage is exclusively borrowed and at least
    // opus_decoder_get_size(channels) bytes, 4-byte aligned
    let code = unsafe {
        opus_decoder_init(
            storage.as_mut_ptr(),
            sample_rate,
            c_int::from(mode.channels()),
        )
    };
    if code == OPUS_OK {
        Ok(())
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!(code, message = error_message(code), "opus_decoder_init failed");
        Err(ShimError::Init { code })
    }
}
