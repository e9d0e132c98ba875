use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use num::Float;

use crate::error::{layout_error, Result};

/// An owned, zero-initialized buffer whose first element sits on a caller
/// chosen alignment boundary.
///
/// The region is obtained from the system allocator with an explicit
/// [`Layout`] and released with the same layout in [`Drop`], so it never
/// crosses into `Vec`'s allocator bookkeeping.
///
/// Elements are restricted to IEEE floats, for which an all-zero bit pattern
/// is `0.0`.
///
/// # Example
///
/// ```rust
/// use sgemm_layout_bench::aligned::AlignedBuffer;
///
/// let buf = AlignedBuffer::<f32>::zeroed(1221, 64).unwrap();
/// assert_eq!(buf.len(), 1221);
/// assert!(buf.is_aligned());
/// assert!(buf.iter().all(|&x| x == 0.0));
/// ```
pub struct AlignedBuffer<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

impl<T: Float> AlignedBuffer<T> {
    /// Allocates `len` zeroed elements aligned to `align` bytes.
    ///
    /// Allocator exhaustion aborts the process via [`handle_alloc_error`].
    ///
    /// # Errors
    ///
    /// Returns a `LayoutError` if:
    /// - `align` is not a power of 2
    /// - `align` is less than the natural alignment of `T`
    /// - the byte size overflows `isize`
    pub fn zeroed(len: usize, align: usize) -> Result<Self> {
        let layout = Self::layout_for(len, align)?;
        match Self::raw_alloc(layout) {
            Some(ptr) => Ok(Self { ptr, len, layout }),
            None => handle_alloc_error(layout),
        }
    }

    fn layout_for(len: usize, align: usize) -> Result<Layout> {
        let size = len.checked_mul(mem::size_of::<T>()).ok_or_else(|| {
            layout_error(usize::MAX, align, format!("{len} elements overflow usize"))
        })?;

        if !align.is_power_of_two() {
            return Err(layout_error(size, align, "alignment must be power of two"));
        }
        if align < mem::align_of::<T>() {
            return Err(layout_error(
                size,
                align,
                format!(
                    "alignment is below the natural alignment ({}) of the element type",
                    mem::align_of::<T>()
                ),
            ));
        }

        Layout::from_size_align(size, align)
            .map_err(|err| layout_error(size, align, err.to_string()))
    }

    fn raw_alloc(layout: Layout) -> Option<NonNull<T>> {
        if layout.size() == 0 {
            return Some(NonNull::dangling());
        }
        // SAFETY: layout has a non-zero size and a valid power-of-two alignment.
        NonNull::new(unsafe { alloc_zeroed(layout) } as *mut T)
    }
}

impl<T> AlignedBuffer<T> {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The alignment the buffer was allocated with, in bytes.
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    /// Whether the first element honours the requested alignment.
    /// Empty buffers own no memory and report `true`.
    pub fn is_aligned(&self) -> bool {
        self.len == 0 || (self.ptr.as_ptr() as usize) % self.layout.align() == 0
    }
}

impl<T> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: ptr was returned by alloc_zeroed with exactly this layout.
            unsafe {
                dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
            }
        }
    }
}

impl<T> Deref for AlignedBuffer<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        // SAFETY: ptr is valid (or dangling with len 0) for len initialized elements.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: as in deref; &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

// SAFETY: the buffer uniquely owns its elements, like Box<[T]>.
unsafe impl<T: Send> Send for AlignedBuffer<T> {}
unsafe impl<T: Sync> Sync for AlignedBuffer<T> {}

impl<T: std::fmt::Debug> std::fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("alignment", &self.layout.align())
            .finish()
    }
}
