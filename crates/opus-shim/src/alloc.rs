//! Allocator hooks for libopus.
//!
//! libopus routes every dynamic allocation through three functions,
//! `opus_alloc`, `opus_realloc` and `opus_free`. A build with
//! `-DCUSTOM_SUPPORT` lets the embedder supply them. This module provides the
//! inert set: allocation always fails and freeing does nothing.
//!
//! Decoder state is instead reserved by the caller (see
//! [`crate::storage`]), so libopus never needs these paths. If a library
//! configuration does reach them, the null result surfaces as
//! `OPUS_ALLOC_FAIL` from the call that tried to allocate.
//!
//! # Contract
//!
//! | Hook | Arguments | Result | Side effects |
//! |------|-----------|--------|--------------|
//! | [`deny_alloc`] | ignored | null | none |
//! | [`deny_realloc`] | ignored, `ptr` untouched | null | none |
//! | [`ignore_free`] | ignored | — | none |

use core::ffi::c_void;

/// Signature of libopus' `opus_alloc` hook.
pub type AllocFn = extern "C" fn(size: usize) -> *mut c_void;

/// Signature of libopus' `opus_realloc` hook.
pub type ReallocFn = extern "C" fn(ptr: *mut c_void, size: usize) -> *mut c_void;

/// Signature of libopus' `opus_free` hook.
pub type FreeFn = extern "C" fn(ptr: *mut c_void);

/// Refuse an allocation of `size` bytes.
///
/// Always returns null.
pub extern "C" fn deny_alloc(size: usize) -> *mut c_void {
    let _ = size;
    core::ptr::null_mut()
}

/// Refuse to grow or shrink `ptr` to `size` bytes.
///
/// Always returns null. `ptr` is neither read, written nor released, which
/// matches C `realloc` failure semantics: the original block stays valid.
pub extern "C" fn deny_realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    let _ = (ptr, size);
    core::ptr::null_mut()
}

/// Ignore a release of `ptr`.
pub extern "C" fn ignore_free(ptr: *mut c_void) {
    let _ = ptr;
}

/// Allocator configuration handed to libopus.
///
/// Layout-compatible with a C struct of three function pointers so it can
/// cross the FFI boundary as-is.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AllocHooks {
    /// Called where libopus would call `malloc`.
    pub alloc: AllocFn,
    /// Called where libopus would call `realloc`.
    pub realloc: ReallocFn,
    /// Called where libopus would call `free`.
    pub free: FreeFn,
}

impl AllocHooks {
    /// Hooks that never hand out memory.
    pub const NO_HEAP: Self = Self {
        alloc: deny_alloc,
        realloc: deny_realloc,
        free: ignore_free,
    };

    /// Request `size` bytes from the configured `alloc` hook.
    #[must_use]
    pub fn allocate(&self, size: usize) -> *mut c_void {
        (self.alloc)(size)
    }

    /// Resize `ptr` through the configured `realloc` hook.
    #[must_use]
    pub fn reallocate(&self, ptr: *mut c_void, size: usize) -> *mut c_void {
        (self.realloc)(ptr, size)
    }

    /// Release `ptr` through the configured `free` hook.
    pub fn release(&self, ptr: *mut c_void) {
        (self.free)(ptr);
    }

    /// `true` when all three hooks are the inert ones from [`Self::NO_HEAP`].
    ///
    /// Compares function addresses. Identical functions can in principle be
    /// merged by the linker, so a `false` here is only meaningful for hooks
    /// with different behaviour.
    #[must_use]
    pub fn is_no_heap(&self) -> bool {
        self.alloc as usize == deny_alloc as AllocFn as usize
            && self.realloc as usize == deny_realloc as ReallocFn as usize
            && self.free as usize == ignore_free as FreeFn as usize
    }
}

impl Default for AllocHooks {
    fn default() -> Self {
        Self::NO_HEAP
    }
}

impl core::fmt::Debug for AllocHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AllocHooks")
            .field("alloc", &(self.alloc as *const ()))
            .field("realloc", &(self.realloc as *const ()))
            .field("free", &(self.free as *const ()))
            .finish()
    }
}

/// C names of the `alloc`, `realloc` and `free` hooks, in that order.
pub const HOOK_SYMBOLS: [&str; 3] = ["opus_alloc", "opus_realloc", "opus_free"];

/// Hooks behind the exported `opus_*` symbols.
///
/// A const rather than a mutable static: which allocator a linked libopus
/// sees is fixed at build time.
pub const LINKED_HOOKS: AllocHooks = AllocHooks::NO_HEAP;

/// `opus_alloc` for a libopus built with `-DCUSTOM_SUPPORT`.
#[cfg(feature = "custom-support")]
#[no_mangle]
pub extern "C" fn opus_alloc(size: usize) -> *mut c_void {
    LINKED_HOOKS.allocate(size)
}

/// `opus_realloc` for a libopus built with `-DCUSTOM_SUPPORT`.
#[cfg(feature = "custom-support")]
#[no_mangle]
pub extern "C" fn opus_realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    LINKED_HOOKS.reallocate(ptr, size)
}

/// `opus_free` for a libopus built with `-DCUSTOM_SUPPORT`.
#[cfg(feature = "custom-support")]
#[no_mangle]
pub extern "C" fn opus_free(ptr: *mut c_void) {
    LINKED_HOOKS.release(ptr);
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    extern "C" fn dangling_alloc(size: usize) -> *mut c_void {
        let _ = size;
        // Never dereferenced.
        core::ptr::NonNull::<c_void>::dangling().as_ptr()
    }

    extern "C" fn dangling_realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
        let _ = (ptr, size);
        core::ptr::NonNull::<c_void>::dangling().as_ptr()
    }

    static FREED: core::sync::atomic::AtomicUsize = core::sync::atomic::AtomicUsize::new(0);

    extern "C" fn counting_free(ptr: *mut c_void) {
        let _ = ptr;
        FREED.fetch_add(1, core::sync::atomic::Ordering::Relaxed);
    }

    #[test]
    fn test_deny_alloc_returns_null() {
        assert!(deny_alloc(0).is_null());
        assert!(deny_alloc(1024).is_null());
        assert!(deny_alloc(usize::MAX).is_null());
    }

    #[test]
    fn test_deny_realloc_leaves_block_untouched() {
        let mut block = [0xA5u8; 32];
        let ptr = block.as_mut_ptr().cast::<c_void>();
        assert!(deny_realloc(ptr, 64).is_null());
        assert!(deny_realloc(ptr, 0).is_null());
        assert_eq!(block, [0xA5u8; 32]);
    }

    #[test]
    fn test_ignore_free_leaves_block_untouched() {
        let mut block = [7u8; 16];
        ignore_free(block.as_mut_ptr().cast());
        ignore_free(core::ptr::null_mut());
        assert_eq!(block[0], 7);
        assert_eq!(block[15], 7);
    }

    #[test]
    fn test_no_heap_is_default() {
        assert!(AllocHooks::default().is_no_heap());
        assert!(LINKED_HOOKS.is_no_heap());
    }

    #[test]
    fn test_custom_hooks_are_not_no_heap() {
        let hooks = AllocHooks {
            alloc: dangling_alloc,
            ..AllocHooks::NO_HEAP
        };
        assert!(!hooks.is_no_heap());
        assert!(!hooks.allocate(8).is_null());
    }

    #[test]
    fn test_each_hook_is_compared() {
        let realloc_swapped = AllocHooks {
            realloc: dangling_realloc,
            ..AllocHooks::NO_HEAP
        };
        let free_swapped = AllocHooks {
            free: counting_free,
            ..AllocHooks::NO_HEAP
        };
        assert!(!realloc_swapped.is_no_heap());
        assert!(!free_swapped.is_no_heap());
        free_swapped.release(core::ptr::null_mut());
        assert!(FREED.load(core::sync::atomic::Ordering::Relaxed) >= 1);

        let rebuilt = AllocHooks {
            alloc: deny_alloc,
            realloc: deny_realloc,
            free: ignore_free,
        };
        assert!(rebuilt.is_no_heap());
    }

    #[test]
    fn test_hooks_are_c_layout() {
        assert_eq!(
            core::mem::size_of::<AllocHooks>(),
            3 * core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_debug_names_all_hooks() {
        let s = format!("{:?}", AllocHooks::NO_HEAP);
        assert!(s.contains("alloc"));
        assert!(s.contains("realloc"));
        assert!(s.contains("free"));
    }

    #[cfg(feature = "custom-support")]
    #[test]
    fn test_exported_symbols_forward_to_no_heap() {
        let mut block = [1u8; 4];
        let ptr = block.as_mut_ptr().cast::<c_void>();
        assert!(opus_alloc(1024).is_null());
        assert!(opus_realloc(ptr, 2048).is_null());
        opus_free(ptr);
        assert_eq!(block, [1u8; 4]);
    }
}
