use crate::pcie_uart::BridgeCycle;
use crate::stream::Endpoint;

/// Byte-stream device wired to the UART side of the PCIe bridge
pub trait UartPhy {
    /// Drive `sink.valid`/`sink.data` and `source.ready` for the coming cycle
    fn drive(&mut self, sink: &mut Endpoint, source: &mut Endpoint);

    /// Handshake outcome of the cycle just evaluated
    fn complete(&mut self, cycle: &BridgeCycle);
}

/// Named interrupt-capable block
pub trait IrqSource {
    fn name(&self) -> &str;

    /// Line level for the current cycle
    fn is_interrupt(&mut self) -> bool;
}
