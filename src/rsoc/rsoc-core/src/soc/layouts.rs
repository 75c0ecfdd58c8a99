// Register layouts of the standard SoC blocks. External IP whose registers
// are owned by its own driver (DMA, DDR PHY, CRG) gets an empty page.
use crate::csr::CsrDescriptor;

pub static CTRL: [CsrDescriptor; 3] = [
    CsrDescriptor::strobe("reset", 1),
    CsrDescriptor::storage("scratch", 32),
    CsrDescriptor::status("bus_errors", 32),
];

pub static TIMER: [CsrDescriptor; 8] = [
    CsrDescriptor::storage("load", 32),
    CsrDescriptor::storage("reload", 32),
    CsrDescriptor::storage("en", 1),
    CsrDescriptor::strobe("update_value", 1),
    CsrDescriptor::status("value", 32),
    CsrDescriptor::status("ev_status", 1),
    CsrDescriptor::strobe("ev_pending", 1),
    CsrDescriptor::storage("ev_enable", 1),
];

pub static UART_PHY: [CsrDescriptor; 1] = [CsrDescriptor::storage("tuning_word", 32)];

pub static UART: [CsrDescriptor; 8] = [
    CsrDescriptor::strobe("rxtx", 8),
    CsrDescriptor::status("txfull", 1),
    CsrDescriptor::status("rxempty", 1),
    CsrDescriptor::status("ev_status", 2),
    CsrDescriptor::strobe("ev_pending", 2),
    CsrDescriptor::storage("ev_enable", 2),
    CsrDescriptor::status("txempty", 1),
    CsrDescriptor::status("rxfull", 1),
];

pub static DNA: [CsrDescriptor; 1] = [CsrDescriptor::status("id", 57)];

pub static XADC: [CsrDescriptor; 4] = [
    CsrDescriptor::status("temperature", 12),
    CsrDescriptor::status("vccint", 12),
    CsrDescriptor::status("vccaux", 12),
    CsrDescriptor::status("vccbram", 12),
];

pub static PCIE_PHY: [CsrDescriptor; 5] = [
    CsrDescriptor::status("lnk_up", 1),
    CsrDescriptor::status("msi_enable", 1),
    CsrDescriptor::status("bus_master_enable", 1),
    CsrDescriptor::status("max_request_size", 16),
    CsrDescriptor::status("max_payload_size", 16),
];

pub static LEDS: [CsrDescriptor; 1] = [CsrDescriptor::storage("out", 8)];

pub static EXTERNAL: [CsrDescriptor; 0] = [];
