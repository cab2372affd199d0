//! `/dev/mem` register window mapping.
//!
//! Each supported GPIO controller is reached through a single 4096-byte
//! window mapped once per process and never unmapped. The mappings live in a
//! fixed-capacity table keyed by physical base address, so repeated pin
//! construction reuses the existing window instead of re-opening `/dev/mem`.

use std::io;
use std::ptr::{self, NonNull};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::MmioError;

const PAGE_BYTES: usize = 4096;
const PAGE_WORDS: usize = PAGE_BYTES / 4;

/// One slot per supported bank or platform variant; the table never grows.
const MAX_MAPPINGS: usize = 8;

type Slot = Option<(u64, RegisterPage)>;

static MAPPINGS: Mutex<[Slot; MAX_MAPPINGS]> = Mutex::new([None; MAX_MAPPINGS]);

/// A 4096-byte hardware register window mapped into process memory.
///
/// The raw pointer never leaves this type; all access goes through the
/// bounded word accessors below. Copies alias the same window, which is the
/// point: every pin on a bank shares one mapping.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RegisterPage {
    base: NonNull<u32>,
}

// The window aliases device registers, not Rust-managed memory, and every
// access is volatile.
unsafe impl Send for RegisterPage {}
unsafe impl Sync for RegisterPage {}

impl RegisterPage {
    /// Reads the 32-bit register at `word`. Volatile, so the device is read
    /// on every call.
    pub(crate) fn read(&self, word: usize) -> u32 {
        assert!(word < PAGE_WORDS, "register word {word} outside the mapped window");
        // SAFETY: `base` points at a live PAGE_BYTES mapping and `word` is in
        // bounds.
        unsafe { self.base.as_ptr().add(word).read_volatile() }
    }

    /// Writes the 32-bit register at `word`. Volatile, so the store reaches
    /// the device before the call returns.
    pub(crate) fn write(&self, word: usize, value: u32) {
        assert!(word < PAGE_WORDS, "register word {word} outside the mapped window");
        // SAFETY: as in `read`.
        unsafe { self.base.as_ptr().add(word).write_volatile(value) };
    }

    /// Read-modify-write on the register at `word`.
    pub(crate) fn update(&self, word: usize, f: impl FnOnce(u32) -> u32) {
        self.write(word, f(self.read(word)));
    }

    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        let window: &'static mut [u32; PAGE_WORDS] = Box::leak(Box::new([0; PAGE_WORDS]));
        Self {
            base: NonNull::from(window).cast(),
        }
    }
}

/// Returns the register window for the controller at `phys_base`, mapping it
/// on first use.
///
/// Failed attempts are not cached, so a later call can succeed once the
/// privilege problem is fixed.
pub(crate) fn acquire(phys_base: u64) -> Result<RegisterPage, MmioError> {
    let mut table = MAPPINGS.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some((_, page)) = table.iter().flatten().find(|(base, _)| *base == phys_base) {
        return Ok(*page);
    }

    let page = map_window(phys_base)?;
    if let Some(slot) = table.iter_mut().find(|slot| slot.is_none()) {
        *slot = Some((phys_base, page));
    }
    Ok(page)
}

fn map_window(phys_base: u64) -> Result<RegisterPage, MmioError> {
    // SAFETY: plain syscall with a static path.
    let fd = unsafe { libc::open(c"/dev/mem".as_ptr(), libc::O_RDWR | libc::O_SYNC) };
    if fd < 0 {
        return Err(MmioError::DevMem(io::Error::last_os_error()));
    }

    // SAFETY: mapping a fresh window; the kernel picks the address.
    let window = unsafe {
        libc::mmap(
            ptr::null_mut(),
            PAGE_BYTES,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_SHARED,
            fd,
            phys_base as libc::off_t,
        )
    };
    let mmap_error = io::Error::last_os_error();

    // The mapping keeps the window alive on its own; the descriptor is no
    // longer needed either way.
    // SAFETY: `fd` is the descriptor opened above.
    let _ = unsafe { libc::close(fd) };

    if window == libc::MAP_FAILED {
        return Err(MmioError::Mmap(mmap_error));
    }
    let Some(base) = NonNull::new(window.cast::<u32>()) else {
        return Err(MmioError::Mmap(io::Error::other("mmap returned a null window")));
    };

    debug!("mapped gpio register window at {phys_base:#x}");
    Ok(RegisterPage { base })
}

/// Burns a short run of volatile writes so a line settles after a direction
/// change before the first level read.
///
/// Written through a volatile pointer so the loop cannot be elided or
/// reordered, just like the register accesses it separates.
pub(crate) fn settle_spin() {
    const SETTLE_WRITES: u32 = 50;

    let mut scratch: u32 = 0;
    let cell: *mut u32 = &mut scratch;
    for _ in 0..SETTLE_WRITES {
        // SAFETY: `cell` points at the live `scratch` local.
        unsafe { cell.write_volatile(cell.read_volatile().wrapping_add(1)) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_round_trip() {
        let page = RegisterPage::for_test();

        page.write(13, 0x8000_0001);
        assert_eq!(page.read(13), 0x8000_0001);
        assert_eq!(page.read(12), 0);
    }

    #[test]
    fn update_modifies_in_place() {
        let page = RegisterPage::for_test();

        page.write(7, 0b1010);
        page.update(7, |v| v | 0b0101);
        assert_eq!(page.read(7), 0b1111);
        page.update(7, |v| v & !0b0011);
        assert_eq!(page.read(7), 0b1100);
    }

    #[test]
    #[should_panic(expected = "outside the mapped window")]
    fn reads_are_bounded_to_the_window() {
        let page = RegisterPage::for_test();
        let _ = page.read(PAGE_WORDS);
    }

    #[test]
    fn copies_alias_the_same_window() {
        let page = RegisterPage::for_test();
        let alias = page;

        page.write(1, 42);
        assert_eq!(alias.read(1), 42);
    }
}
