//! Memory-mapped GPIO register block.
//!
//! This module provides a safe wrapper around an `mmap` of the GPIO device file. It performs:
//! 1. **Open:** Opens the device with `O_SYNC` so the kernel maps the block uncached.
//! 2. **Map:** Establishes a shared read/write mapping of a fixed window.
//! 3. **Access:** Bounds- and alignment-checked volatile word reads and writes.
//! 4. **Teardown:** Unmaps and closes exactly once, on `close` or drop.

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};

use tracing::{debug, trace};

use crate::common::constants::{DEFAULT_MAP_LEN, WORD_SIZE};
use crate::common::error::{GpioError, GpioResult};
use crate::soc::traits::RegisterAccess;

/// A live `mmap` region together with the descriptor it was created from.
///
/// Field order matters: the region is unmapped in `Drop` before `_fd` closes.
struct Mapping {
    base: NonNull<u8>,
    len: usize,
    _fd: OwnedFd,
}

impl Drop for Mapping {
    fn drop(&mut self) {
        // SAFETY: `base`/`len` describe a mapping returned by a successful mmap
        // and owned exclusively by this value; it is unmapped only here.
        let rc = unsafe { libc::munmap(self.base.as_ptr().cast(), self.len) };
        if rc != 0 {
            debug!(error = %io::Error::last_os_error(), "munmap of GPIO block failed");
        }
    }
}

/// Exclusively owned mapping of the GPIO register block.
///
/// All accesses are volatile, so the compiler neither caches, merges, nor
/// reorders them; a write is always visible to a later read of the same offset.
pub struct RegisterMap {
    path: PathBuf,
    len: usize,
    mapping: Option<Mapping>,
}

// SAFETY: the mapping is plain device memory reached only through volatile word
// accesses; it carries no thread-affine state. Releasing it needs `&mut self`.
unsafe impl Send for RegisterMap {}
// SAFETY: see above; concurrent `&self` accesses are individual volatile words.
unsafe impl Sync for RegisterMap {}

impl RegisterMap {
    /// Maps the default window (offset 0, one page) of `path`.
    ///
    /// # Errors
    ///
    /// `DeviceUnavailable` if the file cannot be opened, `MapFailed` if `mmap` fails.
    pub fn open(path: impl AsRef<Path>) -> GpioResult<Self> {
        Self::open_with(path, 0, DEFAULT_MAP_LEN)
    }

    /// Maps `len` bytes of `path` starting at file offset `offset`.
    ///
    /// `offset` must be page aligned; for `/dev/mem` it is the physical base of the
    /// GPIO block, for `/dev/gpiomem` it is 0.
    ///
    /// # Errors
    ///
    /// `DeviceUnavailable` if the file cannot be opened, `MapFailed` if the window
    /// is empty, the offset does not fit `off_t`, or `mmap` fails.
    pub fn open_with(path: impl AsRef<Path>, offset: u64, len: usize) -> GpioResult<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(&path)
            .map_err(|source| GpioError::DeviceUnavailable {
                path: path.clone(),
                source,
            })?;
        let fd = OwnedFd::from(file);

        let map_failed = |source: io::Error| GpioError::MapFailed {
            path: path.clone(),
            source,
        };

        if len == 0 {
            return Err(map_failed(io::Error::new(
                io::ErrorKind::InvalidInput,
                "zero-length register window",
            )));
        }
        let file_offset = libc::off_t::try_from(offset).map_err(|_| {
            map_failed(io::Error::new(
                io::ErrorKind::InvalidInput,
                "map offset exceeds off_t",
            ))
        })?;

        // SAFETY: a fresh shared mapping at a kernel-chosen address; the
        // descriptor is valid for the duration of the call and kept open after.
        let raw = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd.as_raw_fd(),
                file_offset,
            )
        };
        if raw == libc::MAP_FAILED {
            return Err(map_failed(io::Error::last_os_error()));
        }
        let Some(base) = NonNull::new(raw.cast::<u8>()) else {
            return Err(map_failed(io::Error::other("mmap returned a null mapping")));
        };

        debug!(path = %path.display(), offset, len, "mapped GPIO register block");

        Ok(Self {
            path,
            len,
            mapping: Some(Mapping { base, len, _fd: fd }),
        })
    }

    /// Returns the device path this map was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` while the mapping is live.
    pub const fn is_mapped(&self) -> bool {
        self.mapping.is_some()
    }

    /// Unmaps the block and closes the device descriptor.
    ///
    /// Calling this again, or dropping afterwards, does nothing. Later accesses
    /// fail with `GpioError::Closed`.
    pub fn close(&mut self) {
        if self.mapping.take().is_some() {
            debug!(path = %self.path.display(), "released GPIO register block");
        }
    }

    /// Validates `offset` and returns a pointer to the word it names.
    fn word_ptr(&self, offset: usize) -> GpioResult<*mut u32> {
        let mapping = self.mapping.as_ref().ok_or(GpioError::Closed)?;
        let in_window = offset
            .checked_add(WORD_SIZE)
            .is_some_and(|end| end <= self.len);
        if offset % WORD_SIZE != 0 || !in_window {
            return Err(GpioError::OutOfRange {
                offset,
                len: self.len,
            });
        }
        // SAFETY: `offset + 4 <= len`, so the result stays inside the mapping.
        // The base is page aligned and `offset` word aligned, so the word is aligned.
        Ok(unsafe { mapping.base.as_ptr().add(offset) }.cast::<u32>())
    }
}

impl RegisterAccess for RegisterMap {
    fn len(&self) -> usize {
        self.len
    }

    fn read_word(&self, offset: usize) -> GpioResult<u32> {
        let word = self.word_ptr(offset)?;
        // SAFETY: `word_ptr` checked bounds and alignment against the live mapping.
        let value = unsafe { ptr::read_volatile(word) };
        trace!(offset, value, "gpio register read");
        Ok(value)
    }

    fn write_word(&self, offset: usize, value: u32) -> GpioResult<()> {
        let word = self.word_ptr(offset)?;
        trace!(offset, value, "gpio register write");
        // SAFETY: `word_ptr` checked bounds and alignment against the live mapping.
        unsafe { ptr::write_volatile(word, value) };
        Ok(())
    }
}

impl fmt::Debug for RegisterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterMap")
            .field("path", &self.path)
            .field("len", &self.len)
            .field("mapped", &self.is_mapped())
            .finish()
    }
}
