pub mod gpio;
pub mod interrupt_controller;
pub mod system_timer;

use core::mem;
use core::ptr::NonNull;

pub(crate) const WORD_SIZE: usize = mem::size_of::<u32>();

/// A window of device memory made of 32-bit registers.
///
/// Every access is volatile and bounds-checked against the window. Register
/// layouts declared with `register_structs!` can be overlaid on top of it with
/// [`RegisterView::registers`].
pub struct RegisterView {
    base: NonNull<u32>,
    words: usize,
}

impl RegisterView {
    // SAFETY: `base` must point to `words` readable and writable 32-bit words
    // that stay valid for as long as the view exists
    pub const unsafe fn new(base: NonNull<u32>, words: usize) -> Self {
        Self { base, words }
    }

    pub const fn len(&self) -> usize {
        self.words
    }

    pub const fn as_ptr(&self) -> *const u32 {
        self.base.as_ptr()
    }

    pub fn read(&self, index: usize) -> u32 {
        assert!(index < self.len(), "register {index} outside of a {} word window", self.len());
        // SAFETY: The index was checked above, see RegisterView::new()'s
        // safety section
        unsafe { self.base.as_ptr().add(index).read_volatile() }
    }

    pub fn write(&self, index: usize, value: u32) {
        assert!(index < self.len(), "register {index} outside of a {} word window", self.len());
        // SAFETY: Same as above
        unsafe { self.base.as_ptr().add(index).write_volatile(value) }
    }

    /// Overlay a register block starting `offset` bytes into the window.
    pub fn registers<T>(&self, offset: usize) -> &T {
        assert!(offset % mem::align_of::<T>() == 0);
        assert!(offset + mem::size_of::<T>() <= self.len() * WORD_SIZE);
        // SAFETY: The block fits inside the window and register_structs! types
        // are made of UnsafeCell-backed registers which tolerate access both
        // through the overlay and through read()/write()
        unsafe { &*self.base.as_ptr().cast::<u8>().add(offset).cast::<T>() }
    }
}

/// Memory barrier to issue when moving from one peripheral to another.
///
/// BCM283x peripherals sit on separate AXI paths, so reads from two different
/// blocks may return out of order without one.
#[inline]
pub fn peripheral_switch() {
    #[cfg(target_arch = "aarch64")]
    aarch64_cpu::asm::barrier::dmb(aarch64_cpu::asm::barrier::SY);
    #[cfg(not(target_arch = "aarch64"))]
    core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
}

#[cfg(test)]
impl RegisterView {
    // Heap backed window standing in for /dev/mem in tests
    pub(crate) fn leaked(words: usize) -> Self {
        let backing: &'static mut [u32] = Box::leak(vec![0u32; words].into_boxed_slice());
        // SAFETY: The leaked slice is never freed
        unsafe { Self::new(NonNull::from(backing).cast(), words) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tock_registers::interfaces::{Readable, Writeable};
    use tock_registers::register_structs;
    use tock_registers::registers::ReadWrite;

    register_structs! {
        #[allow(non_snake_case)]
        PairRegisters {
            (0x0 => FIRST: ReadWrite<u32>),
            (0x4 => SECOND: ReadWrite<u32>),
            (0x8 => @END),
        }
    }

    #[test]
    fn read_back_written_words() {
        let view = RegisterView::leaked(16);
        view.write(3, 0xDEAD_BEEF);
        assert_eq!(view.read(3), 0xDEAD_BEEF);
        assert_eq!(view.read(2), 0);
        assert_eq!(view.len(), 16);
    }

    #[test]
    #[should_panic]
    fn read_outside_window() {
        let view = RegisterView::leaked(16);
        view.read(16);
    }

    #[test]
    #[should_panic]
    fn write_outside_window() {
        let view = RegisterView::leaked(16);
        view.write(100, 1);
    }

    #[test]
    fn overlay_shares_words() {
        let view = RegisterView::leaked(16);
        let regs: &PairRegisters = view.registers(0x8);
        regs.SECOND.set(7);
        assert_eq!(view.read(3), 7);
        view.write(2, 9);
        assert_eq!(regs.FIRST.get(), 9);
    }

    #[test]
    #[should_panic]
    fn overlay_past_end() {
        let view = RegisterView::leaked(4);
        let _: &PairRegisters = view.registers(0xc);
    }

    #[test]
    #[should_panic]
    fn overlay_misaligned() {
        let view = RegisterView::leaked(4);
        let _: &PairRegisters = view.registers(0x2);
    }
}
