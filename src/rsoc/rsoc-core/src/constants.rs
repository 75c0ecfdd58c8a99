// Width of one CSR slot on the bus, in bits and in bytes
pub const CSR_DATA_WIDTH: u32 = 32;
pub const CSR_WORD_BYTES: usize = 4;

// Each CSR region owns one 2 KiB page of the CSR window
pub const CSR_REGION_PAGE: u32 = 0x800;
pub const CSR_MAX_REGIONS: usize = 32;

// Interrupt line counts
pub const CPU_INTERRUPTS: usize = 32;
pub const MSI_LINES: usize = 32;
pub const MSI_QUEUE_DEPTH: usize = 8;

pub mod mem_map {
    // Default bus address of each memory region
    pub const ROM_BASE: u32 = 0x2000_0000;
    pub const SRAM_BASE: u32 = 0x1000_0000;
    pub const MAIN_RAM_BASE: u32 = 0x4000_0000;
    pub const CSR_BASE: u32 = 0x8000_0000;

    // CSR window spans every region page
    pub const CSR_SIZE: u32 = 0x1_0000;

    // Largest main RAM window mapped on the bus
    pub const MAIN_RAM_MAX_SIZE: u32 = 0x4000_0000;
}

pub mod csr_locations {
    // Region indices held back for the standard SoC blocks
    pub const RESERVED: [(&str, usize); 10] = [
        ("ctrl", 0),
        ("crg", 1),
        ("uart_phy", 2),
        ("uart", 3),
        ("identifier_mem", 4),
        ("timer0", 5),
        ("buttons", 6),
        ("leds", 7),
        ("sdram", 8),
        ("l2_cache", 9),
    ];
}

pub mod cpu_interrupts {
    // CPU interrupt lines held back for the standard SoC blocks
    pub const RESERVED: [(&str, usize); 2] = [("timer0", 1), ("uart", 2)];
}

pub mod pcie_uart {
    // Register offsets within the pcie_uart CSR region
    pub const RX_VALID: usize = 0x00;
    pub const RX_READY: usize = 0x04;
    pub const RX_DATA: usize = 0x08;
    pub const TX_VALID: usize = 0x0c;
    pub const TX_READY: usize = 0x10;
    pub const TX_DATA: usize = 0x14;
}

pub mod msi {
    // Register offsets within the pcie_msi CSR region
    pub const ENABLE: usize = 0x00;
    pub const CLEAR: usize = 0x04;
    pub const VECTOR: usize = 0x08;
}
