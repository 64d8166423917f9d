use clap::ValueEnum;

#[allow(non_upper_case_globals)]
pub const KiB: u64 = 1 << 10;
#[allow(non_upper_case_globals)]
pub const GiB: u64 = 1 << 30;

// Every peripheral window we map is one page of device memory
pub const BLOCK_SIZE: u64 = 4 * KiB;

// BCM283x peripheral blocks, relative to the SoC's peripheral base
pub const TIMER_OFFSET: u64 = 0x3000;
pub const INTERRUPT_OFFSET: u64 = 0xB000;
pub const GPIO_OFFSET: u64 = 0x20_0000;

// ARM physical addresses on BCM283x all sit in the first GiB
const ADDRESS_SPACE_SIZE: u64 = GiB;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub struct AddressPhysical {
    addr: u64,
}

impl AddressPhysical {
    pub const fn new(addr: u64) -> Self {
        assert!(addr < ADDRESS_SPACE_SIZE);
        Self { addr }
    }

    pub const fn add(&self, offset: u64) -> Self {
        let addr = self.addr + offset;
        Self::new(addr)
    }

    pub const fn as_u64(&self) -> u64 {
        self.addr
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangePhysical {
    base: AddressPhysical,
    size: u64,
}

impl RangePhysical {
    pub const fn new(base: AddressPhysical, size: u64) -> Self {
        assert!(size > 0);
        // Check that the end address is valid
        base.add(size - 1);
        Self { base, size }
    }

    pub const fn base(&self) -> AddressPhysical {
        self.base
    }

    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// The SoC whose peripheral map is used. Both share the same block layout and
/// only differ in where the peripherals start in the ARM physical address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Soc {
    /// Raspberry Pi 1 and Zero
    Bcm2835,
    /// Raspberry Pi 3
    Bcm2837,
}

impl Soc {
    pub const fn peripherals_base(self) -> AddressPhysical {
        match self {
            Soc::Bcm2835 => AddressPhysical::new(0x2000_0000),
            Soc::Bcm2837 => AddressPhysical::new(0x3F00_0000),
        }
    }

    pub const fn timer(self) -> RangePhysical {
        RangePhysical::new(self.peripherals_base().add(TIMER_OFFSET), BLOCK_SIZE)
    }

    pub const fn interrupt_controller(self) -> RangePhysical {
        RangePhysical::new(self.peripherals_base().add(INTERRUPT_OFFSET), BLOCK_SIZE)
    }

    pub const fn gpio(self) -> RangePhysical {
        RangePhysical::new(self.peripherals_base().add(GPIO_OFFSET), BLOCK_SIZE)
    }
}
