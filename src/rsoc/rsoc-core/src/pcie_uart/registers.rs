use log::{debug, error, warn};

use crate::constants::pcie_uart::*;
use crate::csr::{CsrDescriptor, Storage, Strobe};

/// Register layout, in address order
pub static LAYOUT: [CsrDescriptor; 6] = [
    CsrDescriptor::status("rx_valid", 1),
    CsrDescriptor::strobe("rx_ready", 1),
    CsrDescriptor::status("rx_data", 8),
    CsrDescriptor::strobe("tx_valid", 1),
    CsrDescriptor::status("tx_ready", 1),
    CsrDescriptor::storage("tx_data", 8),
];

/// Combinational inputs behind the status registers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLines {
    pub rx_valid: bool,
    pub rx_data: u8,
    pub tx_ready: bool,
}

/// Host-visible register file of the UART bridge.
///
/// Strobes and storage hold what the host wrote during the current cycle;
/// status registers are read straight from the bridge's lines.
pub struct RegisterFile {
    pub(super) rx_ready: Strobe,
    pub(super) tx_valid: Strobe,
    pub(super) tx_data: Storage,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            rx_ready: Strobe::new(),
            tx_valid: Strobe::new(),
            tx_data: Storage::new(8, 0),
        }
    }

    pub fn reset(&mut self) {
        self.rx_ready.end_cycle();
        self.tx_valid.end_cycle();
        self.tx_data.reset();
    }

    pub fn read(&self, offset: usize, status: StatusLines) -> u32 {
        let value = match offset {
            RX_VALID => status.rx_valid as u32,
            RX_DATA => status.rx_data as u32,
            TX_READY => status.tx_ready as u32,
            TX_DATA => self.tx_data.storage(),

            // Strobes read as zero
            RX_READY | TX_VALID => 0,

            _ => {
                error!("Unmapped pcie_uart read at offset 0x{:x}", offset);
                0
            }
        };
        debug!("pcie_uart read 0x{:02x} -> 0x{:x}", offset, value);
        value
    }

    pub fn write(&mut self, offset: usize, value: u32) {
        debug!("pcie_uart write 0x{:02x} <- 0x{:x}", offset, value);
        match offset {
            RX_READY => self.rx_ready.write(value),
            TX_VALID => self.tx_valid.write(value),
            TX_DATA => self.tx_data.write(value),

            RX_VALID | RX_DATA | TX_READY => {
                warn!("Write attempt to read-only pcie_uart offset 0x{:x}", offset);
            }

            _ => {
                error!("Unmapped pcie_uart write at offset 0x{:x}", offset);
            }
        }
    }

    /// Clock edge: storage takes staged writes, strobe pulses end
    pub fn end_cycle(&mut self) {
        self.tx_data.commit();
        self.rx_ready.end_cycle();
        self.tx_valid.end_cycle();
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
