//! Mapping the peripheral register blocks out of `/dev/mem`.

use crate::address::{RangePhysical, Soc};
use crate::drivers::{RegisterView, WORD_SIZE};
use crate::error::SetupError;
use core::fmt;
use core::num::NonZeroUsize;
use log::debug;
use nix::libc;
use nix::sys::mman::{mmap, MapFlags, ProtFlags};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;

pub const DEV_MEM: &str = "/dev/mem";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
    Timer,
    Gpio,
    Interrupt,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Window::Timer => "timer",
            Window::Gpio => "gpio",
            Window::Interrupt => "int",
        })
    }
}

/// The three register windows the benchmark needs.
///
/// They are never unmapped and stay valid until the process exits.
pub struct Peripherals {
    pub gpio: RegisterView,
    pub timer: RegisterView,
    pub interrupt: RegisterView,
}

pub fn initialize_mappings(soc: Soc) -> Result<Peripherals, SetupError> {
    let mem = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_SYNC)
        .open(DEV_MEM)
        .map_err(SetupError::Open)?;

    let timer = map_window(&mem, Window::Timer, soc.timer());
    let gpio = map_window(&mem, Window::Gpio, soc.gpio());
    let interrupt = map_window(&mem, Window::Interrupt, soc.interrupt_controller());

    // The mappings keep the registers reachable without the descriptor
    drop(mem);

    Ok(Peripherals {
        timer: timer?,
        gpio: gpio?,
        interrupt: interrupt?,
    })
}

fn map_window(mem: &File, window: Window, range: RangePhysical) -> Result<RegisterView, SetupError> {
    let size = range.size() as usize;
    let Some(length) = NonZeroUsize::new(size) else {
        unreachable!("RangePhysical::new() rejects empty ranges");
    };

    // SAFETY: A fresh MAP_SHARED mapping of device memory does not alias any
    // memory owned by Rust. Physical addresses are below 1 GiB so they fit in
    // off_t on every target.
    let base = unsafe {
        mmap(
            None,
            length,
            ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
            MapFlags::MAP_SHARED,
            mem,
            range.base().as_u64() as libc::off_t,
        )
    }
    .map_err(|source| SetupError::Map { window, source })?;

    // SAFETY: The kernel mapped `size` bytes at `base` and they are never
    // unmapped
    let view = unsafe { RegisterView::new(base.cast(), size / WORD_SIZE) };
    debug!("{window} registers at {:#x} mapped to {:p}", range.base().as_u64(), view.as_ptr());

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_names_failing_window() {
        let err = SetupError::Map {
            window: Window::Timer,
            source: nix::Error::EPERM,
        };
        assert!(err.to_string().starts_with("timer mmap error"));
        let err = SetupError::Map {
            window: Window::Interrupt,
            source: nix::Error::EINVAL,
        };
        assert!(err.to_string().starts_with("int mmap error"));
        let err = SetupError::Open(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(err.to_string().starts_with("can't open /dev/mem for gpio"));
    }

    #[test]
    fn views_are_distinct() {
        // Only meaningful on a Raspberry Pi with enough privilege; anywhere else
        // the setup has to fail cleanly instead
        match initialize_mappings(Soc::Bcm2835) {
            Ok(peripherals) => {
                let views = [&peripherals.gpio, &peripherals.timer, &peripherals.interrupt];
                for (i, a) in views.iter().enumerate() {
                    assert!(!a.as_ptr().is_null());
                    assert_eq!(a.len(), 1024);
                    for b in &views[i + 1..] {
                        assert_ne!(a.as_ptr(), b.as_ptr());
                    }
                }
            }
            Err(SetupError::Open(_)) | Err(SetupError::Map { .. }) => {}
        }
    }
}
