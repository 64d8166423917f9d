use crate::address::Soc;
use crate::drivers::gpio::NUM_GPIO_PINS;
use crate::pulse::RING_LEN;
use clap::{value_parser, ArgAction, Parser};

/// Toggle a GPIO pin through /dev/mem and measure pulse frequency and jitter.
///
/// Needs root to open /dev/mem.
#[derive(Debug, Parser)]
#[command(name = "gpio-jitter", version, about)]
pub struct Config {
    /// GPIO pin to pulse.
    #[arg(long, default_value_t = 4, value_parser = value_parser!(u8).range(0..NUM_GPIO_PINS as i64))]
    pub pin: u8,

    /// Number of pulses.
    #[arg(long, default_value_t = 100_000_000, value_parser = value_parser!(u32).range(1..))]
    pub pulses: u32,

    /// SoC peripheral map to use.
    #[arg(long, value_enum, default_value_t = Soc::Bcm2835)]
    pub soc: Soc,

    /// Scratch ring entry to print once the run is done.
    #[arg(long, default_value_t = 1234, value_parser = parse_sample_index)]
    pub sample_index: usize,

    /// Report the level of this input pin before the run.
    #[arg(long, value_parser = value_parser!(u8).range(0..NUM_GPIO_PINS as i64))]
    pub button: Option<u8>,

    /// More log output, repeat for even more.
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_sample_index(arg: &str) -> Result<usize, String> {
    let index: usize = arg.parse().map_err(|err| format!("{err}"))?;
    if index < RING_LEN {
        Ok(index)
    } else {
        Err(format!("must be below {RING_LEN}"))
    }
}
