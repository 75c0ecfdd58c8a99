//! UART tunnelled over the PCIe register window.
//!
//! The bridge sits between the SoC's UART byte streams and a register file
//! the host reaches through BAR0. RX bytes are held by the upstream channel
//! until the host pulses `rx_ready`; TX bytes are staged in `tx_data` and
//! launched with a `tx_valid` pulse.

mod registers;

pub use registers::{RegisterFile, StatusLines, LAYOUT};

use alloc::string::{String, ToString};
use log::debug;

use crate::clock::ClockDomain;
use crate::csr::{CsrBank, CsrDescriptor};
use crate::stream::Endpoint;

/// TX path state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxState {
    Idle,
    Transmitting,
}

/// Handshake activity seen during one cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeCycle {
    pub rx_ready: bool,       // Ready level driven upstream
    pub rx_byte: Option<u8>,  // Byte taken from the upstream channel
    pub tx_valid: bool,       // Valid level driven downstream
    pub tx_byte: Option<u8>,  // Byte handed to the downstream channel
}

pub struct PcieUart {
    domain: String,
    regs: RegisterFile,
    sink: Endpoint,   // UART -> host
    source: Endpoint, // Host -> UART
    state: TxState,
}

impl PcieUart {
    pub fn new(cd: &ClockDomain) -> Self {
        Self {
            domain: cd.name().to_string(),
            regs: RegisterFile::new(),
            sink: Endpoint::idle(),
            source: Endpoint::idle(),
            state: TxState::Idle,
        }
    }

    pub fn tx_state(&self) -> TxState {
        self.state
    }

    /// Upstream channel; its producer drives `valid` and `data`
    pub fn sink(&self) -> &Endpoint {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut Endpoint {
        &mut self.sink
    }

    /// Downstream channel; its consumer drives `ready`
    pub fn source(&self) -> &Endpoint {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut Endpoint {
        &mut self.source
    }

    /// Both channels at once, for a PHY driving its side of each
    pub fn endpoints_mut(&mut self) -> (&mut Endpoint, &mut Endpoint) {
        (&mut self.sink, &mut self.source)
    }

    pub fn status(&self) -> StatusLines {
        StatusLines {
            rx_valid: self.sink.valid,
            rx_data: self.sink.data,
            tx_ready: self.state == TxState::Idle,
        }
    }

    /// Combinational outputs from registered state and this cycle's writes
    fn settle(&mut self) {
        self.sink.ready = self.regs.rx_ready.re();
        self.source.valid = self.state == TxState::Transmitting;
        self.source.data = self.regs.tx_data.storage() as u8;
    }

    /// Evaluates the current cycle and applies the rising edge.
    pub fn tick(&mut self, cd: &ClockDomain) -> BridgeCycle {
        debug_assert_eq!(cd.name(), self.domain);

        if cd.in_reset() {
            self.state = TxState::Idle;
            self.regs.reset();
            self.settle();
            return BridgeCycle::default();
        }

        self.settle();
        let cycle = BridgeCycle {
            rx_ready: self.sink.ready,
            rx_byte: self.sink.transfer(),
            tx_valid: self.source.valid,
            tx_byte: self.source.transfer(),
        };

        // A new launch takes priority over completion
        self.state = if self.regs.tx_valid.re() {
            TxState::Transmitting
        } else if self.source.ready {
            TxState::Idle
        } else {
            self.state
        };
        if let Some(byte) = cycle.tx_byte {
            debug!("pcie_uart: sent 0x{:02x} downstream", byte);
        }

        self.regs.end_cycle();
        self.settle();
        cycle
    }
}

impl CsrBank for PcieUart {
    fn layout(&self) -> &'static [CsrDescriptor] {
        &LAYOUT
    }

    fn read(&self, offset: usize) -> u32 {
        self.regs.read(offset, self.status())
    }

    fn write(&mut self, offset: usize, value: u32) {
        self.regs.write(offset, value);
    }
}
