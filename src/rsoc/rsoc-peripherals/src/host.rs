//! Host-side polling driver for the PCIe UART registers.
//!
//! The driver issues at most one register access per cycle, the way a host
//! doing single-dword BAR reads and writes would. Accesses are absolute bus
//! addresses inside the `pcie_uart` region.

use heapless::Deque;
use log::trace;

use rsoc_core::constants::pcie_uart::*;
use rsoc_core::csr::HostBus;

const HOST_FIFO: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HostOp {
    PollTxReady,
    WriteTxData(u8),
    WriteTxValid,
    PollRxValid,
    ReadRxData,
    AckRx,
}

pub struct UartHost {
    base: u32, // pcie_uart region base
    op: HostOp,
    tx: Deque<u8, HOST_FIFO>,
    rx: Deque<u8, HOST_FIFO>,
}

impl UartHost {
    pub fn new(base: u32) -> Self {
        Self {
            base,
            op: HostOp::PollTxReady,
            tx: Deque::new(),
            rx: Deque::new(),
        }
    }

    /// Queues a byte for the SoC. Gives the byte back if the queue is full.
    pub fn send(&mut self, byte: u8) -> Result<(), u8> {
        self.tx.push_back(byte)
    }

    /// Next byte received from the SoC
    pub fn recv(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    pub fn tx_pending(&self) -> usize {
        self.tx.len()
    }

    fn addr(&self, offset: usize) -> u32 {
        self.base + offset as u32
    }

    /// One bus access
    pub fn step(&mut self, bus: &mut dyn HostBus) {
        trace!("uart host: {:?}", self.op);
        self.op = match self.op {
            HostOp::PollTxReady => match self.tx.front() {
                Some(&byte) if bus.read(self.addr(TX_READY)) & 1 != 0 => HostOp::WriteTxData(byte),
                _ => HostOp::PollRxValid,
            },
            HostOp::WriteTxData(byte) => {
                bus.write(self.addr(TX_DATA), byte as u32);
                HostOp::WriteTxValid
            }
            HostOp::WriteTxValid => {
                bus.write(self.addr(TX_VALID), 1);
                self.tx.pop_front();
                HostOp::PollRxValid
            }
            HostOp::PollRxValid => {
                if !self.rx.is_full() && bus.read(self.addr(RX_VALID)) & 1 != 0 {
                    HostOp::ReadRxData
                } else {
                    HostOp::PollTxReady
                }
            }
            HostOp::ReadRxData => {
                let byte = bus.read(self.addr(RX_DATA)) as u8;
                // Room was checked before committing to the read
                let _ = self.rx.push_back(byte);
                HostOp::AckRx
            }
            HostOp::AckRx => {
                bus.write(self.addr(RX_READY), 1);
                HostOp::PollTxReady
            }
        };
    }
}

#[cfg(test)]
mod host_tests {
    use super::*;
    use crate::loopback::LoopbackPhy;
    use rsoc_core::clock::ClockDomain;
    use rsoc_core::constants::mem_map::CSR_BASE;
    use rsoc_core::csr::{CsrMap, CsrRegistry};
    use rsoc_core::pcie_uart::{PcieUart, LAYOUT};
    use rsoc_core::periph::UartPhy;
    use rsoc_core::soc::CsrBus;

    fn csr_map() -> CsrMap {
        let mut reg = CsrRegistry::new(CSR_BASE);
        reg.add("pcie_uart", &LAYOUT).unwrap();
        reg.freeze()
    }

    fn run(cycles: usize, host: &mut UartHost, phy: &mut LoopbackPhy) -> Vec<u8> {
        let map = csr_map();
        let mut cd = ClockDomain::new("sys", 100_000_000);
        let mut uart = PcieUart::new(&cd);
        let mut echoed = Vec::new();
        for _ in 0..cycles {
            let (sink, source) = uart.endpoints_mut();
            phy.drive(sink, source);
            host.step(&mut CsrBus::new(&map, Some(&mut uart), None));
            let cycle = uart.tick(&cd);
            phy.complete(&cycle);
            cd.advance();
            while let Some(byte) = host.recv() {
                echoed.push(byte);
            }
        }
        echoed
    }

    fn uart_base() -> u32 {
        csr_map().get("pcie_uart").unwrap().base
    }

    #[test]
    fn test_loopback_round_trip() {
        let mut host = UartHost::new(uart_base());
        let mut phy = LoopbackPhy::new();
        for &b in b"hello".iter() {
            host.send(b).unwrap();
        }
        let echoed = run(200, &mut host, &mut phy);
        assert_eq!(echoed, b"hello");
        assert_eq!(host.tx_pending(), 0);
        assert_eq!(phy.pending(), 0);
    }

    #[test]
    fn test_idle_host_only_polls() {
        let mut host = UartHost::new(uart_base());
        let mut phy = LoopbackPhy::new();
        assert!(run(20, &mut host, &mut phy).is_empty());
    }

    #[test]
    fn test_wrong_base_reaches_nothing() {
        // An address outside the bridge's page never launches a byte
        let mut host = UartHost::new(CSR_BASE + 0x800 * 30);
        let mut phy = LoopbackPhy::new();
        host.send(0x55).unwrap();
        assert!(run(50, &mut host, &mut phy).is_empty());
        assert_eq!(phy.pending(), 0);
    }
}
