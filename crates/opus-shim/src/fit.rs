//! Drift checks between the pinned storage sizes and a real libopus.
//!
//! The sizes in [`crate::storage`] are measurements, not something libopus
//! promises. When libopus is upgraded or rebuilt with different options the
//! real `OpusDecoder` can grow, and a decoder initialised into too-small
//! storage overwrites whatever follows it. The functions here compare the
//! sizes against what the library reports before any decoder is initialised.
//!
//! The size source is injected as a closure so the checks run the same way
//! against a linked library (`ffi::verify_linked`, feature `link`) and in
//! tests.

use crate::config::{LIBOPUS_VERSION_PREFIX, PINNED_LIBOPUS_VERSION};
use crate::error::ShimError;
use crate::storage::{ChannelMode, OpusDecoder};

/// Check that [`OpusDecoder`] can hold a decoder of `reported_size` bytes in
/// `mode`.
///
/// # Errors
///
/// - [`ShimError::Unsupported`] if this build cannot host `mode` at all.
/// - [`ShimError::TooSmall`] if `reported_size` exceeds the storage.
pub fn check_fits(mode: ChannelMode, reported_size: usize) -> Result<(), ShimError> {
    if !mode.is_supported() {
        return Err(ShimError::Unsupported { mode });
    }
    let available = core::mem::size_of::<OpusDecoder>();
    if reported_size > available {
        #[cfg(feature = "defmt")]
        defmt::error!(
            "OpusDecoder storage too small for {}: {} > {} bytes",
            mode,
            reported_size,
            available
        );
        #[cfg(feature = "tracing")]
        tracing::error!(
            mode = mode.channels(),
            required = reported_size,
            available,
            "OpusDecoder storage too small"
        );
        return Err(ShimError::TooSmall {
            mode,
            required: reported_size,
            available,
        });
    }
    Ok(())
}

/// Check that `version` is what `opus_get_version_string()` returns for
/// the pinned release.
///
/// Accepts `"libopus 1.5.2"` and builds with a suffix such as
/// `"libopus 1.5.2-fixed"`. `"libopus 1.5.20"` is rejected.
///
/// # Errors
///
/// Returns [`ShimError::VersionMismatch`] for any other string.
pub fn check_version(version: &str) -> Result<(), ShimError> {
    let release = version
        .strip_prefix(LIBOPUS_VERSION_PREFIX)
        .and_then(|rest| rest.strip_prefix(PINNED_LIBOPUS_VERSION));
    match release {
        Some(suffix) if suffix.is_empty() || suffix.starts_with('-') => Ok(()),
        _ => {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "linked libopus {=str} is not the pinned release {=str}",
                version,
                PINNED_LIBOPUS_VERSION
            );
            #[cfg(feature = "tracing")]
            tracing::error!(
                version,
                pinned = PINNED_LIBOPUS_VERSION,
                "linked libopus is not the pinned release"
            );
            Err(ShimError::VersionMismatch)
        }
    }
}

/// Run [`check_fits`] for every mode this build supports.
///
/// `reporter` receives the channel count and returns the size libopus
/// reports for it, in the same `int` convention as
/// `opus_decoder_get_size()` (zero or negative means the channel count was
/// rejected).
///
/// # Errors
///
/// Returns the first failing check, or [`ShimError::InvalidSize`] when the
/// reporter returns a non-positive size.
pub fn verify_with<F>(mut reporter: F) -> Result<(), ShimError>
where
    F: FnMut(u8) -> i32,
{
    for mode in [ChannelMode::Mono, ChannelMode::Stereo] {
        if !mode.is_supported() {
            continue;
        }
        let reported = reporter(mode.channels());
        let size = match usize::try_from(reported) {
            Ok(size) if size > 0 => size,
            _ => return Err(ShimError::InvalidSize { reported }),
        };
        check_fits(mode, size)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::cast_possible_wrap,
    clippy::arithmetic_side_effects,
    clippy::expect_used
)]
mod tests {
    use super::*;
    use crate::storage::{OPUS_DECODER_SIZE_CH1, OPUS_DECODER_SIZE_CH2};

    /// Sizes the pinned fixed-point 1.5.2 build reports.
    fn pinned_reporter(channels: u8) -> i32 {
        match channels {
            1 => OPUS_DECODER_SIZE_CH1 as i32,
            2 => OPUS_DECODER_SIZE_CH2 as i32,
            _ => 0,
        }
    }

    #[test]
    fn test_exact_size_fits() {
        assert_eq!(check_fits(ChannelMode::Mono, OPUS_DECODER_SIZE_CH1), Ok(()));
    }

    #[test]
    fn test_smaller_object_fits() {
        assert_eq!(check_fits(ChannelMode::Mono, 1), Ok(()));
    }

    #[test]
    fn test_grown_object_is_rejected() {
        let available = core::mem::size_of::<OpusDecoder>();
        let result = check_fits(ChannelMode::Mono, available + 4);
        assert_eq!(
            result,
            Err(ShimError::TooSmall {
                mode: ChannelMode::Mono,
                required: available + 4,
                available,
            })
        );
    }

    #[test]
    fn test_stereo_needs_feature() {
        let result = check_fits(ChannelMode::Stereo, OPUS_DECODER_SIZE_CH2);
        if cfg!(feature = "stereo") {
            assert_eq!(result, Ok(()));
        } else {
            assert_eq!(
                result,
                Err(ShimError::Unsupported {
                    mode: ChannelMode::Stereo
                })
            );
        }
    }

    #[test]
    fn test_pinned_sizes_verify() {
        assert_eq!(verify_with(pinned_reporter), Ok(()));
    }

    #[test]
    fn test_verify_only_asks_for_supported_modes() {
        let mut asked = Vec::new();
        verify_with(|channels| {
            asked.push(channels);
            pinned_reporter(channels)
        })
        .expect("pinned sizes must verify");
        if cfg!(feature = "stereo") {
            assert_eq!(asked, vec![1, 2]);
        } else {
            assert_eq!(asked, vec![1]);
        }
    }

    #[test]
    fn test_verify_rejects_grown_library() {
        let result = verify_with(|channels| pinned_reporter(channels) + 64);
        assert!(matches!(result, Err(ShimError::TooSmall { .. })));
    }

    #[test]
    fn test_verify_rejects_non_positive_size() {
        assert_eq!(
            verify_with(|_| 0),
            Err(ShimError::InvalidSize { reported: 0 })
        );
        assert_eq!(
            verify_with(|_| -1),
            Err(ShimError::InvalidSize { reported: -1 })
        );
    }

    #[test]
    fn test_version_accepts_pinned_release() {
        assert_eq!(check_version("libopus 1.5.2"), Ok(()));
        assert_eq!(check_version("libopus 1.5.2-fixed"), Ok(()));
    }

    #[test]
    fn test_version_rejects_other_releases() {
        for version in [
            "libopus 1.5.1",
            "libopus 1.5.20",
            "libopus 1.4",
            "1.5.2",
            "libopus1.5.2",
            "",
        ] {
            assert_eq!(
                check_version(version),
                Err(ShimError::VersionMismatch),
                "{version:?} must be rejected"
            );
        }
    }
}
