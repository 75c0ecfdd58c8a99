use heapless::Deque;

use rsoc_core::pcie_uart::BridgeCycle;
use rsoc_core::periph::UartPhy;
use rsoc_core::stream::Endpoint;

const LOOPBACK_DEPTH: usize = 16;

/// Echoes every byte the host sends back towards the host
pub struct LoopbackPhy {
    fifo: Deque<u8, LOOPBACK_DEPTH>,
}

impl LoopbackPhy {
    pub fn new() -> Self {
        Self { fifo: Deque::new() }
    }

    pub fn pending(&self) -> usize {
        self.fifo.len()
    }
}

impl Default for LoopbackPhy {
    fn default() -> Self {
        Self::new()
    }
}

impl UartPhy for LoopbackPhy {
    fn drive(&mut self, sink: &mut Endpoint, source: &mut Endpoint) {
        match self.fifo.front() {
            Some(&byte) => {
                sink.valid = true;
                sink.data = byte;
            }
            None => sink.valid = false,
        }
        source.ready = !self.fifo.is_full();
    }

    fn complete(&mut self, cycle: &BridgeCycle) {
        if cycle.rx_byte.is_some() {
            self.fifo.pop_front();
        }
        if let Some(byte) = cycle.tx_byte {
            // Ready was low when full, so a transfer always has room
            let _ = self.fifo.push_back(byte);
        }
    }
}
