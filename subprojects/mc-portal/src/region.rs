//! Access to the portal's command/response area.

use core::{
    ptr::{self, NonNull},
    sync::atomic::{Ordering, fence},
};

use mc_cmd::NUM_PARAMS;

/// Size of an MC portal command area in bytes.
pub const PORTAL_SIZE: usize = 64;

/// The hardware side of a portal.
///
/// Writing the header is the doorbell: implementations must make every prior
/// param write visible to the firmware before the header write lands, and
/// every param read must observe the firmware's writes that preceded the
/// header read which reported completion.
pub trait PortalRegion {
    /// Writes param word `index` (`0..NUM_PARAMS`) of the command area.
    fn write_param(&mut self, index: usize, value: u64);

    /// Writes the header word, handing the command to the firmware.
    fn write_header(&mut self, value: u64);

    /// Reads the header word of the response area.
    fn read_header(&mut self) -> u64;

    /// Reads param word `index` (`0..NUM_PARAMS`) of the response area.
    fn read_param(&mut self, index: usize) -> u64;

    /// Address of the portal, for diagnostics.
    fn address(&self) -> usize {
        0
    }
}

/// A memory-mapped MC portal.
///
/// ```text
/// Offset  Size  Field
/// ────────────────────────────
/// 0x00    0x08  header
/// 0x08    0x38  params[0..7]
/// ────────────────────────────
/// ```
///
/// All accesses are volatile 64-bit little-endian.
#[derive(Debug)]
pub struct MmioPortal {
    base: NonNull<u64>,
}

// SAFETY: The portal memory is exclusively owned by this value (see `new`), so
// moving it to another thread cannot create aliased access.
unsafe impl Send for MmioPortal {}

impl MmioPortal {
    /// Creates a portal over a mapped command area.
    ///
    /// # Safety
    ///
    /// `base` must point to a mapped, 8-byte aligned MC portal of at least
    /// [`PORTAL_SIZE`] bytes, mapped as device memory, and nothing else may
    /// access it for the lifetime of the returned value.
    pub const unsafe fn new(base: NonNull<u8>) -> Self {
        Self { base: base.cast() }
    }

    #[inline]
    fn word_ptr(&self, word: usize) -> *mut u64 {
        debug_assert!(word <= NUM_PARAMS);
        // SAFETY: `word` is within the 8-word portal area guaranteed by `new`.
        unsafe { self.base.as_ptr().add(word) }
    }
}

impl PortalRegion for MmioPortal {
    #[inline]
    fn write_param(&mut self, index: usize, value: u64) {
        // SAFETY: The pointer is inside the portal area and properly aligned.
        unsafe { ptr::write_volatile(self.word_ptr(index + 1), value.to_le()) };
    }

    #[inline]
    fn write_header(&mut self, value: u64) {
        // Params must reach the portal before the doorbell.
        fence(Ordering::Release);
        // SAFETY: The pointer is inside the portal area and properly aligned.
        unsafe { ptr::write_volatile(self.word_ptr(0), value.to_le()) };
    }

    #[inline]
    fn read_header(&mut self) -> u64 {
        // SAFETY: The pointer is inside the portal area and properly aligned.
        let value = unsafe { ptr::read_volatile(self.word_ptr(0)) };
        fence(Ordering::Acquire);
        u64::from_le(value)
    }

    #[inline]
    fn read_param(&mut self, index: usize) -> u64 {
        // SAFETY: The pointer is inside the portal area and properly aligned.
        u64::from_le(unsafe { ptr::read_volatile(self.word_ptr(index + 1)) })
    }

    fn address(&self) -> usize {
        self.base.as_ptr() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmio_layout() {
        let mut mem = [0u64; 8];
        // SAFETY: `mem` is an aligned 64-byte area owned by this test.
        let mut portal = unsafe { MmioPortal::new(NonNull::from(&mut mem).cast()) };

        portal.write_param(0, 0x11);
        portal.write_param(6, 0x77);
        portal.write_header(0xAA);

        assert_eq!(portal.read_header(), 0xAA);
        assert_eq!(portal.read_param(0), 0x11);
        assert_eq!(portal.read_param(6), 0x77);
        drop(portal);

        assert_eq!(mem[0], u64::to_le(0xAA));
        assert_eq!(mem[1], u64::to_le(0x11));
        assert_eq!(mem[7], u64::to_le(0x77));
    }
}
