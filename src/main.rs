mod address;
mod config;
mod drivers;
mod error;
mod irq;
mod logging;
mod memory;
mod pulse;

use clap::Parser;
use config::Config;
use drivers::gpio::GpioPin;
use drivers::interrupt_controller::InterruptController;
use drivers::system_timer::SystemTimer;
use irq::InterruptGate;
use log::info;
use pulse::{PulseRing, PulseSummary};
use std::process::ExitCode;

// What exit(-1) reports to the shell
const SETUP_FAILURE: u8 = 255;

fn main() -> ExitCode {
    let config = Config::parse();
    logging::init(logging::level_for(config.verbose));

    println!("Starting GPIO & timer test for {} pulses", config.pulses);

    let peripherals = match memory::initialize_mappings(config.soc) {
        Ok(peripherals) => peripherals,
        Err(err) => {
            println!("{err}");
            return ExitCode::from(SETUP_FAILURE);
        }
    };
    info!("peripherals mapped for {:?}", config.soc);

    if let Some(button) = config.button {
        print_button(&GpioPin::new(&peripherals.gpio, button));
    }

    let pin = GpioPin::new(&peripherals.gpio, config.pin);
    let timer = SystemTimer::new(&peripherals.timer);
    let mut gate = InterruptGate::new(InterruptController::new(&peripherals.interrupt));
    let mut ring = PulseRing::new();

    let summary = pulse::benchmark(
        &pin,
        &timer,
        &mut gate,
        config.pulses,
        &mut ring,
        config.sample_index,
    );
    print_summary(&summary);

    ExitCode::SUCCESS
}

fn print_button(pin: &GpioPin) {
    if pin.is_high() {
        println!("Button pressed!");
    } else {
        println!("Button released!");
    }
}

fn print_summary(summary: &PulseSummary) {
    println!(
        "Done!\nCounter = {}, buffer[{}] = {}",
        summary.final_counter,
        summary.sample_index,
        summary.sample.unwrap_or_default()
    );
    println!("Time: {} us", summary.elapsed_ticks());
    println!("Frequency: {:6.3} Mhz", summary.frequency_mhz());
    println!("Max delay: {} us", summary.max_delay_ticks);
}
