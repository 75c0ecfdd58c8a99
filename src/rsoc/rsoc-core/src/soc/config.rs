use alloc::string::{String, ToString};

use crate::constants::CSR_DATA_WIDTH;
use crate::platform::{Board, TargetKind};

/// Build-time SoC parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocConfig {
    pub sys_clk_freq: u64,
    pub csr_data_width: u32,
    pub integrated_rom_size: u32,
    pub integrated_sram_size: u32,
    pub integrated_main_ram_size: u32, // Zero selects the board's external RAM
    pub ident: String,
    pub with_pcie_uart: bool,
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            sys_clk_freq: 100_000_000,
            csr_data_width: CSR_DATA_WIDTH,
            integrated_rom_size: 0x10000,
            integrated_sram_size: 0x10000,
            integrated_main_ram_size: 0x10000,
            ident: "Nereid LiteX Test SoC".to_string(),
            with_pcie_uart: true,
        }
    }
}

impl SocConfig {
    /// Stock configuration for a board's target
    pub fn for_board(board: &Board) -> Self {
        match board.target {
            TargetKind::PcieSoc => Self::default(),
            TargetKind::SerialSoc => Self {
                sys_clk_freq: 50_000_000,
                integrated_rom_size: 0x8000,
                integrated_sram_size: 0x2000,
                integrated_main_ram_size: 0,
                ident: alloc::format!("LiteX SoC on {}", board.name),
                with_pcie_uart: false,
                ..Self::default()
            },
        }
    }
}
