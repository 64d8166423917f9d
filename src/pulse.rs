//! The timed pulse loop.
//!
//! A GPIO pin is pulsed a fixed number of times while the system timer is
//! sampled once per pulse. The largest gap between two consecutive samples is
//! the worst-case jitter seen during the run.
//!
//! Known limitation: all arithmetic is done on the low 32 bits of the 1 MHz
//! counter. A run lasting longer than 2^32 µs (about 71 minutes) reports a
//! truncated elapsed time and can under-report the maximum delay. The figures
//! are not corrected; [`PulseSummary::elapsed_truncated`] only tells whether
//! that happened.

use crate::drivers::gpio::GpioPin;
use crate::drivers::peripheral_switch;
use crate::drivers::system_timer::SystemTimer;
use crate::irq::InterruptGate;
use log::{debug, warn};

pub const RING_BITS: u32 = 20;
/// Number of entries in the scratch ring. Always a power of two.
pub const RING_LEN: usize = 1 << RING_BITS;
const RING_MASK: u32 = (RING_LEN - 1) as u32;

pub trait Output {
    fn set_high(&self);
    fn set_low(&self);
}

/// Low 32 bits of a free-running counter.
pub trait Counter {
    fn ticks(&self) -> u32;
}

/// Scratch buffer the loop writes its counter into every iteration.
///
/// Entry `i` holds the last counter value `c` with `c mod RING_LEN == i`, so
/// only the most recent `RING_LEN` iterations survive.
pub struct PulseRing {
    slots: Box<[u32]>,
}

impl PulseRing {
    pub fn new() -> Self {
        Self {
            slots: vec![0; RING_LEN].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn record(&mut self, counter: u32) {
        self.slots[(counter & RING_MASK) as usize] = counter;
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.slots.get(index).copied()
    }
}

impl Default for PulseRing {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopCounters {
    pub iterations: u32,
    pub max_delay_ticks: u32,
}

/// Pulse `pin` `iterations` times, recording each iteration in `ring` and
/// tracking the largest gap between consecutive `counter` samples.
pub fn run<P: Output, C: Counter>(
    pin: &P,
    counter: &C,
    iterations: u32,
    ring: &mut PulseRing,
) -> LoopCounters {
    let mut count: u32 = 0;
    let mut max_delay: u32 = 0;
    let mut previous = counter.ticks();

    while count < iterations {
        pin.set_high();
        pin.set_low();
        count += 1;
        ring.record(count);

        let now = counter.ticks();
        // No rollover correction, see the module documentation
        let delay = now.wrapping_sub(previous);
        if delay > max_delay {
            max_delay = delay;
        }
        previous = now;
    }

    LoopCounters {
        iterations: count,
        max_delay_ticks: max_delay,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseSummary {
    pub iterations: u32,
    pub final_counter: u32,
    pub sample_index: usize,
    pub sample: Option<u32>,
    pub start: u64,
    pub end: u64,
    pub max_delay_ticks: u32,
}

impl PulseSummary {
    pub fn elapsed_ticks(&self) -> u32 {
        (self.end as u32).wrapping_sub(self.start as u32)
    }

    pub fn frequency_mhz(&self) -> f64 {
        frequency_mhz(self.iterations, self.elapsed_ticks())
    }

    /// Whether the 32-bit elapsed time lost counter wraps.
    pub fn elapsed_truncated(&self) -> bool {
        self.end.wrapping_sub(self.start) != u64::from(self.elapsed_ticks())
    }
}

/// Pulses per microsecond, i.e. MHz.
pub fn frequency_mhz(iterations: u32, elapsed_us: u32) -> f64 {
    f64::from(iterations) / f64::from(elapsed_us)
}

/// The whole benchmark: interrupts off, pin set up, timed loop, interrupts back on.
///
/// A gate failure does not stop the benchmark, the loop simply runs with
/// interrupts in whatever state they were.
pub fn benchmark(
    pin: &GpioPin,
    timer: &SystemTimer,
    gate: &mut InterruptGate,
    iterations: u32,
    ring: &mut PulseRing,
    sample_index: usize,
) -> PulseSummary {
    match gate.disable() {
        Ok(()) => debug!("masked {:?}", gate.saved()),
        Err(err) => debug!("running with interrupts enabled: {err}"),
    }
    peripheral_switch();

    let start = timer.now();

    // The function field must be cleared before the output bit is set
    pin.set_input();
    pin.set_output();
    debug!("GPIO{} configured as {:?}", pin.pin(), pin.function());
    peripheral_switch();

    let counters = run(pin, timer, iterations, ring);
    peripheral_switch();

    let end = timer.now();
    peripheral_switch();

    if let Err(err) = gate.enable() {
        debug!("interrupt state left unchanged: {err}");
    }

    let summary = PulseSummary {
        iterations,
        final_counter: counters.iterations,
        sample_index,
        sample: ring.get(sample_index),
        start,
        end,
        max_delay_ticks: counters.max_delay_ticks,
    };

    if summary.elapsed_truncated() {
        warn!(
            "counter low word wrapped during the run ({} ticks in total), elapsed time and max delay are unreliable",
            end.wrapping_sub(start)
        );
    }

    summary
}
