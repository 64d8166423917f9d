//! Turning hardware interrupt delivery off and back on around the timed loop.
//!
//! This masks IRQs at the interrupt controller, so it affects the whole system
//! and not just this process. FIQ is never touched, masking it has been seen to
//! crash the system. Avoid calling either side right after keyboard input or the
//! key strokes may not be dealt with properly.

use crate::drivers::interrupt_controller::{InterruptController, IrqMasks};
use crate::error::GateError;
use log::warn;

pub struct InterruptGate<'a> {
    controller: InterruptController<'a>,
    // Saved enable registers. A non-zero `irq1` means interrupts are disabled.
    saved: IrqMasks,
}

impl<'a> InterruptGate<'a> {
    pub fn new(controller: InterruptController<'a>) -> Self {
        Self {
            controller,
            saved: IrqMasks::default(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.saved.irq1 != 0
    }

    pub fn saved(&self) -> IrqMasks {
        self.saved
    }

    /// Mask every enabled IRQ, remembering which ones so that enable() can put
    /// them back. Refuses while anything is pending rather than dropping it.
    pub fn disable(&mut self) -> Result<(), GateError> {
        if self.is_disabled() {
            // Already disabled, stay quiet
            return Err(GateError::AlreadyDisabled);
        }

        if self.controller.is_any_pending() {
            warn!("Pending interrupts");
            return Err(GateError::Pending);
        }

        self.saved = self.controller.mask_all();
        Ok(())
    }

    pub fn enable(&mut self) -> Result<(), GateError> {
        if !self.is_disabled() {
            warn!("Interrupts not disabled");
            return Err(GateError::NotDisabled);
        }

        self.controller.restore(&self.saved);
        self.saved = IrqMasks::default();
        Ok(())
    }
}
