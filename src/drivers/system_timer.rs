// BCM283x system timer: a free-running 64-bit counter ticking at 1 MHz

use crate::drivers::RegisterView;
use crate::pulse::Counter;
use tock_registers::interfaces::Readable;
use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, ReadWrite};

register_structs! {
    #[allow(non_snake_case)]
    SystemTimerRegisters {
        (0x00 => CS: ReadWrite<u32>),
        (0x04 => CLO: ReadOnly<u32>),
        (0x08 => CHI: ReadOnly<u32>),
        (0x0c => _reserved0),
        (0x1c => @END),
    }
}

pub struct SystemTimer<'a> {
    regs: &'a SystemTimerRegisters,
}

impl<'a> SystemTimer<'a> {
    pub fn new(view: &'a RegisterView) -> Self {
        Self {
            regs: view.registers(0),
        }
    }

    #[inline]
    pub fn low(&self) -> u32 {
        self.regs.CLO.get()
    }

    pub fn high(&self) -> u32 {
        self.regs.CHI.get()
    }

    /// Full 64-bit counter value.
    pub fn now(&self) -> u64 {
        // CLO may carry into CHI between the two reads
        loop {
            let high = self.high();
            let low = self.low();
            if self.high() == high {
                return (u64::from(high) << 32) | u64::from(low);
            }
        }
    }
}

impl Counter for SystemTimer<'_> {
    #[inline]
    fn ticks(&self) -> u32 {
        self.low()
    }
}
