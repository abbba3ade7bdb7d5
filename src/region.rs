//! Address-range model for the host image and loaded extensions.
//!
//! The export and trampoline layers never allocate or map memory; they only
//! reason about where things already live. [`MemoryRegion`] describes the
//! host's statically linked text segment when verifying trampoline placement,
//! and an extension module's placement on the loader side.

/// A contiguous memory region identified by base address and length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    base: usize,
    len: usize,
}

impl MemoryRegion {
    /// Creates a region starting at `base` spanning `len` bytes.
    #[inline]
    pub const fn new(base: usize, len: usize) -> Self {
        Self { base, len }
    }

    /// Gets the base address of the region.
    #[inline]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Gets the length of the region in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the region spans zero bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the first address past the end of the region.
    #[inline]
    pub const fn end(&self) -> usize {
        self.base.saturating_add(self.len)
    }

    /// Returns whether `addr` falls inside the region.
    #[inline]
    pub const fn contains(&self, addr: usize) -> bool {
        addr >= self.base && addr < self.end()
    }

    /// Returns whether `ptr` falls inside the region.
    #[inline]
    pub fn contains_ptr(&self, ptr: *const ()) -> bool {
        self.contains(ptr as usize)
    }

    /// Returns whether the two regions share at least one address.
    #[inline]
    pub const fn overlaps(&self, other: &MemoryRegion) -> bool {
        self.base < other.end() && other.base < self.end()
    }
}
