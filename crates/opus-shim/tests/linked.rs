//! Tests against a real libopus.
//!
//! Needs the pinned fixed-point libopus build on the link path:
//!
//!   OPUS_LIB_DIR=/path/to/opus/lib cargo test -p opus-shim --features link --test linked
#![cfg(feature = "link")]
#![allow(clippy::large_stack_arrays, clippy::expect_used)]

use opus_shim::ffi::{
    error_message, init_decoder, linked_size, linked_version, verify_linked, OPUS_BAD_ARG,
};
use opus_shim::{ChannelMode, OpusDecoder, ShimError};

#[test]
fn linked_library_is_pinned_release() {
    assert!(
        linked_version().starts_with("libopus "),
        "unexpected version string {:?}",
        linked_version()
    );
    assert_eq!(verify_linked(), Ok(()));
}

#[test]
fn reported_size_fits_storage() {
    let mono = linked_size(ChannelMode::Mono).expect("mono size");
    assert!(mono <= core::mem::size_of::<OpusDecoder>());
    if cfg!(feature = "stereo") {
        let stereo = linked_size(ChannelMode::Stereo).expect("stereo size");
        assert!(stereo <= core::mem::size_of::<OpusDecoder>());
    }
}

#[test]
fn decoder_initialises_in_stack_storage() {
    let mut decoder = OpusDecoder::new();
    assert_eq!(init_decoder(&mut decoder, 16_000, ChannelMode::Mono), Ok(()));
}

#[test]
fn stereo_without_feature_is_refused_before_libopus() {
    let mut decoder = OpusDecoder::new();
    let result = init_decoder(&mut decoder, 48_000, ChannelMode::Stereo);
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
fn invalid_sample_rate_reports_bad_arg() {
    let mut decoder = OpusDecoder::new();
    let result = init_decoder(&mut decoder, 44_100, ChannelMode::Mono);
    assert_eq!(result, Err(ShimError::Init { code: OPUS_BAD_ARG }));
    assert_eq!(error_message(OPUS_BAD_ARG), "invalid argument");
}
