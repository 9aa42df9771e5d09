use std::io;
use std::mem::{self, ManuallyDrop};
use std::ptr::{self, NonNull};
use std::slice;

use crate::error::{PartitionError, Result};

/// An anonymous `MAP_SHARED` mapping of `f64` cells.
///
/// A mapping created before `fork` stays the same physical memory in the
/// parent and in every child, unlike the rest of the address space. Cells
/// start zeroed. The mapping is unmapped on drop; call [`release`] to see
/// whether `munmap` succeeded.
///
/// [`release`]: SharedRegion::release
pub struct SharedRegion {
    ptr: NonNull<f64>,
    len: usize,
}

impl SharedRegion {
    /// Map a region of `len` cells.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero or its size in bytes overflows `usize`.
    pub fn new(len: usize) -> Result<Self> {
        assert!(len > 0, "shared region must hold at least one cell");
        let bytes = len
            .checked_mul(mem::size_of::<f64>())
            .expect("shared region size overflows usize");

        // SAFETY: anonymous mapping with no address hint, no file descriptor.
        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                bytes,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(PartitionError::Map(io::Error::last_os_error()));
        }
        let ptr = NonNull::new(addr.cast::<f64>())
            .ok_or_else(|| PartitionError::Map(io::Error::other("mmap returned null")))?;

        log::debug!("mapped shared region of {} cells ({} bytes)", len, bytes);
        Ok(Self { ptr, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: [`new`](SharedRegion::new) refuses empty regions.
    /// Kept alongside [`len`](SharedRegion::len).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        // SAFETY: the mapping is `len` cells, page aligned, zero-initialised
        // and lives as long as `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        // SAFETY: as above; `&mut self` makes this the only live view in
        // this process.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Unmap the region, reporting a failed `munmap`.
    pub fn release(self) -> Result<()> {
        let this = ManuallyDrop::new(self);
        unmap(this.ptr, this.len)
    }
}

impl Drop for SharedRegion {
    fn drop(&mut self) {
        if let Err(err) = unmap(self.ptr, self.len) {
            log::warn!("{}", err);
        }
    }
}

fn unmap(ptr: NonNull<f64>, len: usize) -> Result<()> {
    // SAFETY: `ptr`/`len` describe a mapping created by `SharedRegion::new`
    // that has not been unmapped yet.
    let rc = unsafe { libc::munmap(ptr.as_ptr().cast(), len * mem::size_of::<f64>()) };
    if rc == -1 {
        return Err(PartitionError::Unmap(io::Error::last_os_error()));
    }
    log::trace!("unmapped shared region of {} cells", len);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_starts_zeroed() {
        let region = SharedRegion::new(1000).unwrap();
        assert_eq!(region.len(), 1000);
        assert!(region.as_slice().iter().all(|&x| x == 0.0));
        region.release().unwrap();
    }

    #[test]
    fn test_region_read_write() {
        let mut region = SharedRegion::new(16).unwrap();
        for (i, cell) in region.as_mut_slice().iter_mut().enumerate() {
            *cell = i as f64;
        }
        assert_eq!(region.as_slice()[15], 15.0);
    }

    #[test]
    fn test_child_writes_are_visible_to_parent() {
        let mut region = SharedRegion::new(4).unwrap();

        // SAFETY: the child only touches the mapping and then `_exit`s.
        let pid = unsafe { libc::fork() };
        assert!(pid >= 0, "fork failed");
        if pid == 0 {
            region.as_mut_slice()[2] = 42.0;
            unsafe { libc::_exit(0) };
        }

        let mut status = 0;
        assert_eq!(unsafe { libc::waitpid(pid, &mut status, 0) }, pid);
        assert_eq!(region.as_slice(), &[0.0, 0.0, 42.0, 0.0]);
    }
}
