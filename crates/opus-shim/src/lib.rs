//! Heap-free glue between Rust and libopus.
//!
//! libopus normally allocates its decoder state with `malloc`. On targets
//! without a heap that is not an option, so this crate provides the two
//! pieces needed to run the decoder entirely from caller-owned memory:
//!
//! - [`alloc`]: inert replacements for libopus' `opus_alloc`,
//!   `opus_realloc` and `opus_free` hooks. Every allocation request fails,
//!   which libopus reports as `OPUS_ALLOC_FAIL` instead of touching a heap.
//! - [`storage`]: opaque, 4-byte aligned byte buffers large enough to hold
//!   an `OpusDecoder` of the pinned libopus release, so a decoder can live on
//!   the stack, in a `static`, or inside another struct.
//!
//! The storage sizes track one libopus release ([`config::PINNED_LIBOPUS_VERSION`]).
//! [`fit`] checks them against what a linked library reports.
//!
//! # Features
//!
//! - `stereo`: size [`OpusDecoder`] for two channels
//! - `custom-support`: export the `opus_*` allocator symbols for a libopus
//!   built with `-DCUSTOM_SUPPORT`
//! - `link`: link libopus and enable the `ffi` module
//! - `defmt`: defmt derives and logging
//! - `tracing`: tracing events on host builds
//!
//! # Example
//!
//! ```
//! use opus_shim::{AllocHooks, ChannelMode, OpusDecoder};
//!
//! let hooks = AllocHooks::NO_HEAP;
//! assert!(hooks.allocate(1024).is_null());
//!
//! let mut decoder = OpusDecoder::new();
//! assert_eq!(core::mem::size_of_val(&decoder), ChannelMode::SELECTED.storage_size());
//! let _raw = decoder.as_mut_ptr();
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::doc_markdown)] // C identifiers in doc comments
#![allow(clippy::module_name_repetitions)]

pub mod alloc;
pub mod config;
pub mod error;
pub mod fit;
pub mod storage;

#[cfg(feature = "link")]
pub mod ffi;

#[cfg(any(target_os = "none", test))]
mod fatal;

pub use crate::alloc::{deny_alloc, deny_realloc, ignore_free, AllocHooks};
pub use error::ShimError;
pub use storage::{
    ChannelMode, MonoDecoderStorage, OpusDecoder, StereoDecoderStorage, OPUS_DECODER_ALIGN,
    OPUS_DECODER_SIZE_CH1, OPUS_DECODER_SIZE_CH2,
};
