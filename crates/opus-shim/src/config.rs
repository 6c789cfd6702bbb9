//! Build-time configuration and version pins.
//!
//! Everything here is fixed at compile time. The only switch is the
//! `stereo` cargo feature, which selects the size of [`crate::OpusDecoder`].

use crate::storage::ChannelMode;

/// libopus release the storage sizes were measured against.
///
/// Built fixed-point, without DRED, deep PLC or the float API. Any other
/// release or configuration must be re-measured with
/// `opus_decoder_get_size()` before the sizes in [`crate::storage`] are
/// trusted.
pub const PINNED_LIBOPUS_VERSION: &str = "1.5.2";

/// Prefix `opus_get_version_string()` puts in front of the release.
pub const LIBOPUS_VERSION_PREFIX: &str = "libopus ";

/// `true` when the crate was built with the `stereo` feature.
pub const STEREO_ENABLED: bool = cfg!(feature = "stereo");

/// Channel mode the selected [`crate::OpusDecoder`] storage is sized for.
pub const SELECTED_MODE: ChannelMode = if STEREO_ENABLED {
    ChannelMode::Stereo
} else {
    ChannelMode::Mono
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_mode_follows_feature() {
        if cfg!(feature = "stereo") {
            assert_eq!(SELECTED_MODE, ChannelMode::Stereo);
        } else {
            assert_eq!(SELECTED_MODE, ChannelMode::Mono);
        }
    }

    #[test]
    fn test_pinned_version_is_1_5_2() {
        assert_eq!(PINNED_LIBOPUS_VERSION, "1.5.2");
    }
}
