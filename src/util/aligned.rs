//! Cache-line aligned, zero-initialized element storage for flat grids.
//!
//! `Vec<T>` only aligns to `align_of::<T>()`. Grid storage wants every row
//! scan to start on a cache line so vectorized loads never straddle one at
//! the base, so we own the allocation and its `Layout` directly.
//!
//! Zero-length buffers perform no allocation and use a dangling pointer, the
//! same convention `Vec` uses.

use core::mem::{align_of, size_of};
use core::ptr::NonNull;
use core::slice;
use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::fmt;

/// # Safety
///
/// Implementers guarantee the all-zero byte pattern is a valid value and the
/// type has no drop glue. This is required by the zeroed allocation below.
pub unsafe trait Zeroable: Copy {}

/// Why an aligned allocation could not be made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// `len * size_of::<T>()` is not representable as a `Layout`.
    LayoutOverflow,
    /// The allocator returned null for a valid layout.
    Exhausted { bytes: usize },
}

/// Heap-allocated slice with a guaranteed minimum alignment.
pub struct AlignedBuf<T> {
    ptr: NonNull<T>,
    len: usize,
    // `None` for the zero-length buffer, which owns no allocation.
    layout: Option<Layout>,
}

// SAFETY: AlignedBuf owns its data exclusively and behaves like Box<[T]>.
unsafe impl<T: Send> Send for AlignedBuf<T> {}
unsafe impl<T: Sync> Sync for AlignedBuf<T> {}

impl<T: Zeroable> AlignedBuf<T> {
    /// Returns an empty buffer without allocating.
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            layout: None,
        }
    }

    /// Allocates `len` zeroed elements aligned to at least `align` bytes.
    ///
    /// # Panics
    ///
    /// - `align` is not a power of two
    /// - `align` is less than `align_of::<T>()`
    pub fn try_zeroed(len: usize, align: usize) -> Result<Self, AllocError> {
        const { assert!(size_of::<T>() > 0) };
        assert!(align.is_power_of_two());
        assert!(align >= align_of::<T>(), "alignment below type requirement");

        if len == 0 {
            return Ok(Self::empty());
        }

        let layout = Self::layout_for(len, align).ok_or(AllocError::LayoutOverflow)?;

        // SAFETY: layout has non-zero size; T is Zeroable so zeroed memory is
        // a valid initialized [T].
        let raw = unsafe { alloc_zeroed(layout) }.cast::<T>();
        let ptr = NonNull::new(raw).ok_or(AllocError::Exhausted {
            bytes: layout.size(),
        })?;

        Ok(Self {
            ptr,
            len,
            layout: Some(layout),
        })
    }

    /// Infallible variant of [`try_zeroed`](Self::try_zeroed).
    ///
    /// # Panics
    ///
    /// Panics on layout overflow and aborts through `handle_alloc_error` when
    /// the allocator is exhausted, matching `Vec::with_capacity`.
    pub fn zeroed(len: usize, align: usize) -> Self {
        match Self::try_zeroed(len, align) {
            Ok(buf) => buf,
            Err(AllocError::LayoutOverflow) => panic!("aligned buffer size overflow"),
            Err(AllocError::Exhausted { bytes }) => match Layout::from_size_align(bytes, align) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => panic!("aligned buffer size overflow"),
            },
        }
    }

    fn layout_for(len: usize, align: usize) -> Option<Layout> {
        let size = len.checked_mul(size_of::<T>())?;
        Layout::from_size_align(size, align).ok()
    }
}

impl<T> AlignedBuf<T> {
    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes held by the backing allocation (zero when empty).
    #[inline]
    pub fn footprint_bytes(&self) -> usize {
        self.layout.map_or(0, |layout| layout.size())
    }

    /// Alignment of the backing allocation, or `None` when nothing was allocated.
    #[inline]
    pub fn align(&self) -> Option<usize> {
        self.layout.map(|layout| layout.align())
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialized elements (or dangling with
        // len 0, which is a valid empty slice).
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above; uniquely borrowed through &mut self.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> core::ops::Deref for AlignedBuf<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> core::ops::DerefMut for AlignedBuf<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        if let Some(layout) = self.layout.take() {
            // SAFETY: ptr was allocated with exactly this layout; elements are
            // Zeroable (Copy) so there is nothing to drop in place.
            unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
            self.len = 0;
        }
    }
}

impl<T> fmt::Debug for AlignedBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("len", &self.len)
            .field("align", &self.align())
            .finish()
    }
}
