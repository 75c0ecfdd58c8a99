//! Renders a composed SoC into the files software and the FPGA toolchain
//! consume. Every function returns the full text; nothing touches the disk,
//! so a failed build never leaves partial output behind.

mod constraints;
mod csv;
mod header;

pub use constraints::{constraints, ConstraintFormat};
pub use csv::csr_csv;
pub use header::csr_header;
