use crate::memory::Window;
use thiserror::Error;

/// Failures while mapping the peripherals. All of them are fatal.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("can't open /dev/mem for gpio: {0}")]
    Open(#[source] std::io::Error),
    #[error("{window} mmap error: {source}")]
    Map {
        window: Window,
        #[source]
        source: nix::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("interrupts are already disabled")]
    AlreadyDisabled,
    #[error("interrupts are pending")]
    Pending,
    #[error("interrupts were not disabled")]
    NotDisabled,
}
