use crate::drivers::RegisterView;
use crate::pulse::Output;
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, WriteOnly};

pub const NUM_GPIO_PINS: u8 = 54;

// Width of one FSELn field inside a GPFSELx register
const FSEL_BITS: u32 = 3;
const FSEL_MASK: u32 = 0b111;
const FSEL_PER_REGISTER: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionSelect {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

impl FunctionSelect {
    pub const fn from_bits(bits: u32) -> Self {
        match bits & FSEL_MASK {
            0b000 => Self::Input,
            0b001 => Self::Output,
            0b100 => Self::Alt0,
            0b101 => Self::Alt1,
            0b110 => Self::Alt2,
            0b111 => Self::Alt3,
            0b011 => Self::Alt4,
            _ => Self::Alt5,
        }
    }
}

/// GPFSELx register holding the pin's function field, as a word index.
pub const fn fsel_register(pin: u8) -> usize {
    (pin / FSEL_PER_REGISTER) as usize
}

/// Bit position of the pin's function field inside its GPFSELx register.
pub const fn fsel_shift(pin: u8) -> u32 {
    (pin % FSEL_PER_REGISTER) as u32 * FSEL_BITS
}

pub const fn fsel_field(word: u32, pin: u8) -> u32 {
    (word >> fsel_shift(pin)) & FSEL_MASK
}

/// Clear the pin's field, which selects input.
pub const fn clear_fsel(word: u32, pin: u8) -> u32 {
    word & !(FSEL_MASK << fsel_shift(pin))
}

/// OR the output bit into the pin's field. The field must have been cleared
/// first, otherwise leftover bits produce some other function.
pub const fn set_output_bit(word: u32, pin: u8) -> u32 {
    word | ((FunctionSelect::Output as u32) << fsel_shift(pin))
}

register_structs! {
    #[allow(non_snake_case)]
    GpioRegisters {
        (0x000 => _reserved0),
        (0x01c => GPSET0: WriteOnly<u32>),
        (0x020 => GPSET1: WriteOnly<u32>),
        (0x024 => _reserved1),
        (0x028 => GPCLR0: WriteOnly<u32>),
        (0x02c => GPCLR1: WriteOnly<u32>),
        (0x030 => _reserved2),
        (0x034 => GPLEV0: ReadOnly<u32>),
        (0x038 => GPLEV1: ReadOnly<u32>),
        (0x03c => _reserved3),
        (0x0b4 => @END),
    }
}

pub struct GpioPin<'a> {
    view: &'a RegisterView,
    regs: &'a GpioRegisters,
    pin: u8,
}

impl<'a> GpioPin<'a> {
    pub fn new(view: &'a RegisterView, pin: u8) -> Self {
        assert!(pin < NUM_GPIO_PINS);
        GpioPin {
            view,
            regs: view.registers(0),
            pin,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn function(&self) -> FunctionSelect {
        let word = self.view.read(fsel_register(self.pin));
        FunctionSelect::from_bits(fsel_field(word, self.pin))
    }

    pub fn set_input(&self) {
        let gpfselx = fsel_register(self.pin);
        let value = self.view.read(gpfselx);
        self.view.write(gpfselx, clear_fsel(value, self.pin));
    }

    // Hardware requires set_input() first, this only sets the low bit
    pub fn set_output(&self) {
        let gpfselx = fsel_register(self.pin);
        let value = self.view.read(gpfselx);
        self.view.write(gpfselx, set_output_bit(value, self.pin));
    }

    #[inline]
    pub fn set_high(&self) {
        if self.pin < 32 {
            self.regs.GPSET0.set(1 << self.pin);
        } else {
            self.regs.GPSET1.set(1 << (self.pin - 32));
        }
    }

    #[inline]
    pub fn set_low(&self) {
        if self.pin < 32 {
            self.regs.GPCLR0.set(1 << self.pin);
        } else {
            self.regs.GPCLR1.set(1 << (self.pin - 32));
        }
    }

    pub fn is_high(&self) -> bool {
        if self.pin < 32 {
            self.regs.GPLEV0.get() & (1 << self.pin) != 0
        } else {
            self.regs.GPLEV1.get() & (1 << (self.pin - 32)) != 0
        }
    }
}

impl Output for GpioPin<'_> {
    #[inline]
    fn set_high(&self) {
        GpioPin::set_high(self);
    }

    #[inline]
    fn set_low(&self) {
        GpioPin::set_low(self);
    }
}
