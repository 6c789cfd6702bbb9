//! Errors reported by the storage checks and the linked boundary.
//!
//! The allocator hooks have no error surface of their own: a denied
//! allocation is a null pointer, and libopus turns that into its own
//! `OPUS_ALLOC_FAIL`.

use crate::storage::ChannelMode;

/// Error from checking or initialising decoder storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShimError {
    /// libopus needs more bytes than the storage provides.
    #[error("{mode} decoder needs {required} bytes but storage holds {available}")]
    TooSmall {
        /// Mode that was checked.
        mode: ChannelMode,
        /// Size libopus reported.
        required: usize,
        /// Size of [`crate::OpusDecoder`].
        available: usize,
    },
    /// The storage in this build cannot hold a decoder in this mode.
    #[error("{mode} decoders need the `stereo` feature")]
    Unsupported {
        /// Mode that was requested.
        mode: ChannelMode,
    },
    /// A channel count other than 1 or 2.
    #[error("invalid channel count {channels}")]
    InvalidChannels {
        /// Channel count that was given.
        channels: u8,
    },
    /// libopus reported a negative or otherwise meaningless size.
    #[error("libopus reported invalid decoder size {reported}")]
    InvalidSize {
        /// Raw value libopus returned.
        reported: i32,
    },
    /// The linked libopus is not the release the sizes were measured on.
    #[error("linked libopus is not the pinned release")]
    VersionMismatch,
    /// `opus_decoder_init()` returned a non-zero status.
    #[error("opus_decoder_init failed with code {code}")]
    Init {
        /// libopus error code (`OPUS_BAD_ARG`, `OPUS_ALLOC_FAIL`, ...).
        code: i32,
    },
}
