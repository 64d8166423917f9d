// This is a driver for the ARM interrupt controller included in BCM283x

use crate::drivers::RegisterView;
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, ReadWrite};

// The registers start 0x200 into the page mapped at INTERRUPT_OFFSET
pub const REGISTERS_OFFSET: usize = 0x200;

register_structs! {
    #[allow(non_snake_case)]
    ICRegisters {
        (0x00 => IRQ_BASIC_PENDING: ReadOnly<u32>),
        (0x04 => IRQ_PENDING1: ReadOnly<u32>),
        (0x08 => IRQ_PENDING2: ReadOnly<u32>),
        (0x0c => FIQ_CONTROL: ReadWrite<u32>),
        (0x10 => ENABLE_IRQ1: ReadWrite<u32>),
        (0x14 => ENABLE_IRQ2: ReadWrite<u32>),
        (0x18 => ENABLE_IRQ_BASIC: ReadWrite<u32>),
        (0x1c => DISABLE_IRQ1: ReadWrite<u32>),
        (0x20 => DISABLE_IRQ2: ReadWrite<u32>),
        (0x24 => DISABLE_BASIC_IRQ: ReadWrite<u32>),
        (0x28 => @END),
    }
}

/// Snapshot of the three enable registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IrqMasks {
    pub irq1: u32,
    pub irq2: u32,
    pub basic: u32,
}

pub struct InterruptController<'a> {
    regs: &'a ICRegisters,
}

impl<'a> InterruptController<'a> {
    pub fn new(view: &'a RegisterView) -> Self {
        Self {
            regs: view.registers(REGISTERS_OFFSET),
        }
    }

    pub fn is_any_pending(&self) -> bool {
        (self.regs.IRQ_BASIC_PENDING.get()
            | self.regs.IRQ_PENDING1.get()
            | self.regs.IRQ_PENDING2.get())
            != 0
    }

    /// Disable every currently enabled IRQ and return what was enabled.
    ///
    /// Writing a 1 to a DISABLE register masks that source, so each enable
    /// register is read and its value written straight to the matching disable
    /// register. FIQ_CONTROL is left alone.
    pub fn mask_all(&self) -> IrqMasks {
        let basic = self.regs.ENABLE_IRQ_BASIC.get();
        self.regs.DISABLE_BASIC_IRQ.set(basic);
        let irq1 = self.regs.ENABLE_IRQ1.get();
        self.regs.DISABLE_IRQ1.set(irq1);
        let irq2 = self.regs.ENABLE_IRQ2.get();
        self.regs.DISABLE_IRQ2.set(irq2);

        IrqMasks { irq1, irq2, basic }
    }

    pub fn restore(&self, masks: &IrqMasks) {
        self.regs.ENABLE_IRQ1.set(masks.irq1);
        self.regs.ENABLE_IRQ2.set(masks.irq2);
        self.regs.ENABLE_IRQ_BASIC.set(masks.basic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_words() {
        let view = RegisterView::leaked(1024);
        let ic = InterruptController::new(&view);
        assert!(!ic.is_any_pending());

        view.write(130, 1 << 20);
        assert!(ic.is_any_pending());
        view.write(130, 0);

        view.write(132, 0x11);
        view.write(133, 0x22);
        view.write(134, 0x33);
        let masks = ic.mask_all();
        assert_eq!(masks, IrqMasks { irq1: 0x11, irq2: 0x22, basic: 0x33 });
        ic.restore(&IrqMasks { irq1: 1, irq2: 2, basic: 3 });
        assert_eq!([view.read(132), view.read(133), view.read(134)], [1, 2, 3]);
        assert_eq!([view.read(135), view.read(136), view.read(137)], [0x11, 0x22, 0x33]);
        // FIQ control
        assert_eq!(view.read(131), 0);
    }
}
