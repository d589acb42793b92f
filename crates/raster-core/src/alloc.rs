//! Raw storage blocks and the allocator model behind [`Image`](crate::Image).
//!
//! A [`Storage`] owns one contiguous block of components together with the
//! [`AllocatorTag`] that knows how to release it. The tag is the single
//! owner of the release strategy: system heap, page-aligned OS allocation,
//! a caller-supplied allocator, or "borrowed, do not release".
//!
//! Page-aligned blocks matter for zero-copy hand-off: once an allocation
//! crosses the page-size threshold it is made at page granularity, so the
//! block can be given directly to a consumer that requires page alignment
//! (GPU upload paths) without an intermediate copy.
//!
//! Allocation failure is fatal at this layer ([`std::alloc::handle_alloc_error`]);
//! callers needing fallible allocation wrap this contract themselves.

use std::alloc::{alloc, alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;
use std::sync::Arc;

/// Assumed OS page size for the page-aligned allocation path.
pub const PAGE_SIZE: usize = 4096;

/// A pluggable allocation strategy with an allocate/release contract.
///
/// Implementors carry their own opaque state; the library only ever calls
/// `allocate` and, exactly once per block, `release`.
///
/// # Example
///
/// ```rust
/// use raster_core::alloc::StorageAllocator;
/// use std::alloc::{alloc, alloc_zeroed, dealloc, handle_alloc_error, Layout};
/// use std::ptr::NonNull;
///
/// struct CountingAllocator;
///
/// impl StorageAllocator for CountingAllocator {
///     fn allocate(&self, byte_count: usize, alignment: usize, zeroed: bool) -> NonNull<u8> {
///         let layout = Layout::from_size_align(byte_count, alignment).unwrap();
///         let raw = unsafe { if zeroed { alloc_zeroed(layout) } else { alloc(layout) } };
///         NonNull::new(raw).unwrap_or_else(|| handle_alloc_error(layout))
///     }
///
///     unsafe fn release(&self, block: NonNull<u8>, byte_count: usize, alignment: usize) {
///         let layout = Layout::from_size_align(byte_count, alignment).unwrap();
///         unsafe { dealloc(block.as_ptr(), layout) }
///     }
/// }
/// ```
pub trait StorageAllocator: Send + Sync {
    /// Allocates `byte_count` bytes at the given alignment.
    ///
    /// Failure is fatal; implementations should call
    /// [`handle_alloc_error`] rather than return.
    fn allocate(&self, byte_count: usize, alignment: usize, zeroed: bool) -> NonNull<u8>;

    /// Releases a block previously returned by `allocate`.
    ///
    /// Called exactly once per block, with the same `byte_count` and
    /// `alignment` the block was allocated with.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by `allocate` on this same allocator
    /// and must not be used after this call.
    unsafe fn release(&self, block: NonNull<u8>, byte_count: usize, alignment: usize);
}

/// The ownership strategy recorded alongside a [`Storage`] block.
#[derive(Clone)]
pub enum AllocatorTag {
    /// Aligned system heap allocation; released via the global allocator.
    Heap,
    /// Page-granular allocation suitable for direct hand-off to consumers
    /// requiring page alignment.
    PageAligned,
    /// Caller-supplied allocator; released through its
    /// [`StorageAllocator::release`].
    Custom(Arc<dyn StorageAllocator>),
    /// Externally owned memory; never released by this library.
    Borrowed,
}

impl AllocatorTag {
    /// Returns `true` if dropping the storage releases the block.
    #[inline]
    pub fn owns_memory(&self) -> bool {
        !matches!(self, AllocatorTag::Borrowed)
    }
}

impl fmt::Debug for AllocatorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocatorTag::Heap => f.write_str("Heap"),
            AllocatorTag::PageAligned => f.write_str("PageAligned"),
            AllocatorTag::Custom(_) => f.write_str("Custom(..)"),
            AllocatorTag::Borrowed => f.write_str("Borrowed"),
        }
    }
}

/// An owned block of `count` components of type `T`.
///
/// The block may be over-allocated relative to the logical pixel count
/// (padding); the logical size is tracked by the owning image, not here.
/// Released exactly once, through the recorded [`AllocatorTag`], when
/// dropped.
///
/// `Clone` performs a deep copy into freshly chosen default storage; this is
/// what [`Image`](crate::Image) relies on for copy-on-write via
/// [`Arc::make_mut`].
pub struct Storage<T> {
    ptr: NonNull<T>,
    count: usize,
    alignment: usize,
    tag: AllocatorTag,
}

unsafe impl<T: Send> Send for Storage<T> {}
unsafe impl<T: Sync> Sync for Storage<T> {}

impl<T> Storage<T> {
    /// Allocates storage for `count` components using the default strategy:
    /// page-aligned once the byte size reaches [`PAGE_SIZE`], aligned heap
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Aborts via [`handle_alloc_error`] if the allocation fails.
    pub fn allocate(count: usize, zeroed: bool) -> Self {
        assert!(count > 0, "storage must hold at least one component");
        let byte_count = count * size_of::<T>();
        let (tag, alignment) = if byte_count >= PAGE_SIZE {
            (AllocatorTag::PageAligned, PAGE_SIZE)
        } else {
            (AllocatorTag::Heap, align_of::<T>())
        };

        let layout = layout_for(byte_count, alignment);
        let raw = unsafe {
            if zeroed {
                alloc_zeroed(layout)
            } else {
                alloc(layout)
            }
        };
        let ptr = NonNull::new(raw).unwrap_or_else(|| handle_alloc_error(layout));

        Self {
            ptr: ptr.cast(),
            count,
            alignment,
            tag,
        }
    }

    /// Allocates storage through a caller-supplied allocator.
    ///
    /// The allocator is retained in the tag and its `release` is invoked
    /// exactly once when the storage is dropped.
    pub fn allocate_custom(
        count: usize,
        zeroed: bool,
        allocator: Arc<dyn StorageAllocator>,
    ) -> Self {
        assert!(count > 0, "storage must hold at least one component");
        let byte_count = count * size_of::<T>();
        let alignment = align_of::<T>();
        let ptr = allocator.allocate(byte_count, alignment, zeroed);
        Self {
            ptr: ptr.cast(),
            count,
            alignment,
            tag: AllocatorTag::Custom(allocator),
        }
    }

    /// Adopts an externally supplied block without copying.
    ///
    /// The tag decides ownership: [`AllocatorTag::Borrowed`] blocks are
    /// never released; any other tag is released through its strategy when
    /// the storage drops.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `count` components for
    /// the lifetime of the storage, and must match the tag's release
    /// contract (for `Heap`/`PageAligned`, it must have been allocated by
    /// the corresponding path of this module).
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, count: usize, tag: AllocatorTag) -> Self {
        assert!(count > 0, "storage must hold at least one component");
        let alignment = match tag {
            AllocatorTag::PageAligned => PAGE_SIZE,
            _ => align_of::<T>(),
        };
        Self {
            ptr,
            count,
            alignment,
            tag,
        }
    }

    /// Adopts a `Vec`'s allocation without copying.
    ///
    /// The vector's full capacity becomes the block (over-allocation is
    /// permitted); it is released through the heap path on drop.
    pub fn from_vec(vec: Vec<T>) -> Self {
        assert!(!vec.is_empty(), "storage must hold at least one component");
        let mut vec = ManuallyDrop::new(vec);
        let count = vec.capacity();
        // Vec guarantees this layout: `capacity * size_of::<T>()` bytes at
        // the type's natural alignment, matching our Heap release path.
        let ptr = unsafe { NonNull::new_unchecked(vec.as_mut_ptr()) };
        Self {
            ptr,
            count,
            alignment: align_of::<T>(),
            tag: AllocatorTag::Heap,
        }
    }

    /// Number of components the block holds.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The ownership tag recorded for this block.
    #[inline]
    pub fn tag(&self) -> &AllocatorTag {
        &self.tag
    }

    /// The whole block as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.count) }
    }

    /// The whole block as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.count) }
    }

    /// The block's bytes, for byte-identical equality and hashing.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(self.ptr.as_ptr().cast(), self.count * size_of::<T>())
        }
    }

    /// Raw base pointer of the block.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<T> {
        self.ptr
    }
}

impl<T: Copy> Clone for Storage<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::allocate(self.count, false);
        copy.as_mut_slice().copy_from_slice(self.as_slice());
        copy
    }
}

impl<T> Drop for Storage<T> {
    fn drop(&mut self) {
        let byte_count = self.count * size_of::<T>();
        match &self.tag {
            AllocatorTag::Heap | AllocatorTag::PageAligned => unsafe {
                dealloc(
                    self.ptr.as_ptr().cast(),
                    layout_for(byte_count, self.alignment),
                );
            },
            AllocatorTag::Custom(allocator) => unsafe {
                allocator.release(self.ptr.cast(), byte_count, self.alignment);
            },
            AllocatorTag::Borrowed => {}
        }
    }
}

impl<T> fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("count", &self.count)
            .field("tag", &self.tag)
            .finish()
    }
}

#[inline]
fn layout_for(byte_count: usize, alignment: usize) -> Layout {
    Layout::from_size_align(byte_count, alignment.max(1))
        .expect("storage layout overflow")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_small_allocation_is_heap() {
        let storage = Storage::<f32>::allocate(16, true);
        assert!(matches!(storage.tag(), AllocatorTag::Heap));
        assert!(storage.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_large_allocation_is_page_aligned() {
        let storage = Storage::<u8>::allocate(PAGE_SIZE * 2, true);
        assert!(matches!(storage.tag(), AllocatorTag::PageAligned));
        assert_eq!(storage.as_ptr().as_ptr() as usize % PAGE_SIZE, 0);
    }

    #[test]
    fn test_from_vec_adopts_without_copy() {
        let vec = vec![7u16; 64];
        let base = vec.as_ptr();
        let storage = Storage::from_vec(vec);
        assert_eq!(storage.as_ptr().as_ptr().cast_const(), base);
        assert!(storage.as_slice()[..64].iter().all(|&v| v == 7));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = Storage::<u8>::allocate(8, true);
        let b = a.clone();
        a.as_mut_slice()[0] = 42;
        assert_eq!(b.as_slice()[0], 0);
    }

    #[test]
    fn test_custom_allocator_released_once() {
        static RELEASES: AtomicUsize = AtomicUsize::new(0);

        struct Tracking;

        impl StorageAllocator for Tracking {
            fn allocate(&self, byte_count: usize, alignment: usize, zeroed: bool) -> NonNull<u8> {
                let layout = Layout::from_size_align(byte_count, alignment).unwrap();
                let raw = unsafe {
                    if zeroed {
                        alloc_zeroed(layout)
                    } else {
                        alloc(layout)
                    }
                };
                NonNull::new(raw).unwrap_or_else(|| handle_alloc_error(layout))
            }

            unsafe fn release(&self, block: NonNull<u8>, byte_count: usize, alignment: usize) {
                RELEASES.fetch_add(1, Ordering::SeqCst);
                let layout = Layout::from_size_align(byte_count, alignment).unwrap();
                unsafe { dealloc(block.as_ptr(), layout) }
            }
        }

        let storage = Storage::<u32>::allocate_custom(32, true, Arc::new(Tracking));
        assert!(matches!(storage.tag(), AllocatorTag::Custom(_)));
        drop(storage);
        assert_eq!(RELEASES.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_borrowed_storage_not_released() {
        let mut backing = vec![1.0f32; 16];
        {
            let ptr = NonNull::new(backing.as_mut_ptr()).unwrap();
            let storage =
                unsafe { Storage::from_raw_parts(ptr, backing.len(), AllocatorTag::Borrowed) };
            assert_eq!(storage.as_slice()[3], 1.0);
        }
        // Backing vec is still alive and untouched by the drop above.
        assert_eq!(backing[0], 1.0);
    }
}
