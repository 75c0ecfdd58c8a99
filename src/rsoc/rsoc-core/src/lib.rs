#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub mod clock;
pub mod constants;
pub mod csr;
pub mod error;
pub mod interrupts;
pub mod msi;
pub mod pcie_uart;
pub mod periph;
pub mod platform;
pub mod soc;
pub mod stream;

pub use error::ConfigError;
