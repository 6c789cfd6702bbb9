//! Caller-owned storage for libopus' `OpusDecoder`.
//!
//! libopus keeps `struct OpusDecoder` private; callers only learn its size at
//! runtime through `opus_decoder_get_size()`. To put a decoder on the stack
//! the size has to be known at compile time instead, so the types here are
//! plain byte buffers measured against one libopus release
//! ([`crate::config::PINNED_LIBOPUS_VERSION`]).
//!
//! | Type | Channels | Size (bytes) | Align |
//! |------|----------|--------------|-------|
//! | [`MonoDecoderStorage`] | 1 | 17 860 | 4 |
//! | [`StereoDecoderStorage`] | 1 or 2 | 26 580 | 4 |
//!
//! The buffers are opaque: nothing in this crate reads or writes their
//! contents after construction. The address is handed to
//! `opus_decoder_init()`, and every later libopus call receives the same
//! address. The owner's scope ends the decoder's life; libopus never frees
//! it (see [`crate::alloc`]).
//!
//! ## Usage
//! ```rust
//! use opus_shim::storage::{ChannelMode, OpusDecoder};
//!
//! // Reserved in the caller's frame, no heap involved.
//! let mut decoder = OpusDecoder::new();
//! let raw: *mut OpusDecoder = decoder.as_mut_ptr();
//! assert_eq!(raw as usize % OpusDecoder::ALIGN, 0);
//! assert!(ChannelMode::Mono.is_supported());
//! ```

use crate::config::{SELECTED_MODE, STEREO_ENABLED};
use crate::error::ShimError;

// ── Pinned sizes ─────────────────────────────────────────────────────────────

/// `opus_decoder_get_size(1)` for the pinned libopus release.
pub const OPUS_DECODER_SIZE_CH1: usize = 17_860;

/// `opus_decoder_get_size(2)` for the pinned libopus release.
pub const OPUS_DECODER_SIZE_CH2: usize = 26_580;

/// Alignment libopus requires for decoder state.
///
/// libopus aligns its internal sub-structures itself; the outer object only
/// needs the alignment of its `int` and `opus_val32` members.
pub const OPUS_DECODER_ALIGN: usize = 4;

// ── Storage types ────────────────────────────────────────────────────────────

macro_rules! decoder_storage {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[repr(C, align(4))]
        pub struct $name {
            #[allow(dead_code)] // written by libopus through the raw address
            bytes: [u8; $size],
        }

        impl $name {
            /// Size of the buffer in bytes.
            pub const SIZE: usize = $size;

            /// Alignment of the buffer in bytes.
            pub const ALIGN: usize = OPUS_DECODER_ALIGN;

            /// Create zero-filled storage.
            ///
            /// `const` so that storage may sit in a `static` without a
            /// runtime initialiser.
            #[must_use]
            #[allow(clippy::large_stack_arrays)] // the whole point of this type
            pub const fn new() -> Self {
                Self { bytes: [0u8; $size] }
            }

            /// Address to hand to libopus.
            #[must_use]
            pub fn as_mut_ptr(&mut self) -> *mut Self {
                self
            }

            /// Address to hand to read-only libopus queries.
            #[must_use]
            pub fn as_ptr(&self) -> *const Self {
                self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("size", &Self::SIZE)
                    .finish_non_exhaustive()
            }
        }

        const _: () = assert!(core::mem::size_of::<$name>() == $size);
        const _: () = assert!(core::mem::align_of::<$name>() == OPUS_DECODER_ALIGN);
    };
}

decoder_storage!(
    /// Storage big enough for a one-channel `OpusDecoder`.
    MonoDecoderStorage,
    OPUS_DECODER_SIZE_CH1
);

decoder_storage!(
    /// Storage big enough for a one- or two-channel `OpusDecoder`.
    StereoDecoderStorage,
    OPUS_DECODER_SIZE_CH2
);

const _: () = assert!(OPUS_DECODER_SIZE_CH2 >= OPUS_DECODER_SIZE_CH1);

/// Stand-in for libopus' `OpusDecoder`, sized by the `stereo` feature.
///
/// Every pointer to `OpusDecoder` in the `ffi` module is a pointer to this type.
#[cfg(feature = "stereo")]
pub type OpusDecoder = StereoDecoderStorage;

/// Stand-in for libopus' `OpusDecoder`, sized by the `stereo` feature.
///
/// Every pointer to `OpusDecoder` in the `ffi` module is a pointer to this type.
#[cfg(not(feature = "stereo"))]
pub type OpusDecoder = MonoDecoderStorage;

// ── Channel mode ─────────────────────────────────────────────────────────────

/// Number of channels a decoder is initialised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChannelMode {
    /// One channel.
    Mono = 1,
    /// Two interleaved channels.
    Stereo = 2,
}

impl ChannelMode {
    /// Mode [`OpusDecoder`] is sized for in this build.
    pub const SELECTED: Self = SELECTED_MODE;

    /// Number of channels as libopus counts them.
    #[must_use]
    pub const fn channels(self) -> u8 {
        self as u8
    }

    /// Bytes a decoder in this mode occupies in the pinned libopus release.
    #[must_use]
    pub const fn storage_size(self) -> usize {
        match self {
            Self::Mono => OPUS_DECODER_SIZE_CH1,
            Self::Stereo => OPUS_DECODER_SIZE_CH2,
        }
    }

    /// `true` when [`OpusDecoder`] can hold a decoder in this mode.
    ///
    /// Stereo needs the `stereo` feature; mono always fits.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        match self {
            Self::Mono => true,
            Self::Stereo => STEREO_ENABLED,
        }
    }
}

impl From<ChannelMode> for u8 {
    fn from(mode: ChannelMode) -> Self {
        mode.channels()
    }
}

impl TryFrom<u8> for ChannelMode {
    type Error = ShimError;

    fn try_from(channels: u8) -> Result<Self, Self::Error> {
        match channels {
            1 => Ok(Self::Mono),
            2 => Ok(Self::Stereo),
            _ => Err(ShimError::InvalidChannels { channels }),
        }
    }
}

impl core::fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Mono => f.write_str("mono"),
            Self::Stereo => f.write_str("stereo"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::large_stack_arrays)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_storage_is_17860_bytes() {
        assert_eq!(core::mem::size_of::<MonoDecoderStorage>(), 17_860);
        assert_eq!(MonoDecoderStorage::SIZE, 17_860);
    }

    #[test]
    fn test_stereo_storage_is_26580_bytes() {
        assert_eq!(core::mem::size_of::<StereoDecoderStorage>(), 26_580);
        assert_eq!(StereoDecoderStorage::SIZE, 26_580);
    }

    #[test]
    fn test_selected_storage_follows_feature() {
        let expected = if cfg!(feature = "stereo") {
            OPUS_DECODER_SIZE_CH2
        } else {
            OPUS_DECODER_SIZE_CH1
        };
        assert_eq!(core::mem::size_of::<OpusDecoder>(), expected);
        assert_eq!(ChannelMode::SELECTED.storage_size(), expected);
    }

    #[test]
    fn test_storage_is_four_byte_aligned() {
        assert_eq!(core::mem::align_of::<MonoDecoderStorage>(), 4);
        assert_eq!(core::mem::align_of::<StereoDecoderStorage>(), 4);
        let mut storage = OpusDecoder::new();
        assert_eq!(storage.as_mut_ptr() as usize % OPUS_DECODER_ALIGN, 0);
    }

    #[test]
    fn test_new_storage_is_zeroed() {
        let storage = MonoDecoderStorage::new();
        assert!(storage.bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pointers_address_the_storage() {
        let mut storage = MonoDecoderStorage::default();
        let expected = core::ptr::addr_of!(storage) as usize;
        assert_eq!(storage.as_ptr() as usize, expected);
        assert_eq!(storage.as_mut_ptr() as usize, expected);
    }

    #[test]
    fn test_debug_hides_contents() {
        let storage = MonoDecoderStorage::new();
        let s = format!("{storage:?}");
        assert!(s.contains("MonoDecoderStorage"));
        assert!(s.contains("17860"));
        assert!(s.len() < 100);
    }

    #[test]
    fn test_channel_mode_from_primitive() {
        assert_eq!(ChannelMode::try_from(1), Ok(ChannelMode::Mono));
        assert_eq!(ChannelMode::try_from(2), Ok(ChannelMode::Stereo));
        assert_eq!(
            ChannelMode::try_from(0),
            Err(ShimError::InvalidChannels { channels: 0 })
        );
        for channels in 3..=255 {
            assert!(ChannelMode::try_from(channels).is_err());
        }
    }

    #[test]
    fn test_channel_mode_round_trips_through_u8() {
        assert_eq!(u8::from(ChannelMode::Mono), 1);
        assert_eq!(u8::from(ChannelMode::Stereo), 2);
    }

    #[test]
    fn test_stereo_support_follows_feature() {
        assert!(ChannelMode::Mono.is_supported());
        assert_eq!(ChannelMode::Stereo.is_supported(), cfg!(feature = "stereo"));
    }

    #[test]
    fn test_channel_mode_display() {
        assert_eq!(ChannelMode::Mono.to_string(), "mono");
        assert_eq!(ChannelMode::Stereo.to_string(), "stereo");
    }
}
