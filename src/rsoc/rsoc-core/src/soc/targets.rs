use alloc::string::ToString;
use log::debug;

use super::layouts;
use super::{ConstValue, Soc, SocBuilder, SocConfig};
use crate::clock::{Crg, DomainRequest};
use crate::constants::mem_map;
use crate::constants::MSI_LINES;
use crate::error::ConfigError;
use crate::msi::{self, Msi};
use crate::pcie_uart::{self, PcieUart};
use crate::platform::{Platform, TargetKind};

const SDR_MAIN_RAM_SIZE: u32 = 0x0200_0000; // 32 MiB SDR SDRAM on the serial boards
const USER_LEDS: u8 = 8;

/// Composes the SoC for the platform's board. Nothing is emitted on error.
pub fn compose(platform: Platform, config: SocConfig) -> Result<Soc, ConfigError> {
    match platform.board().target {
        TargetKind::PcieSoc => compose_pcie(platform, config),
        TargetKind::SerialSoc => compose_serial(platform, config),
    }
}

/// CPU, ROM/SRAM, control block, identifier and timer shared by every target
fn base_soc(builder: &mut SocBuilder, with_uart: bool) -> Result<(), ConfigError> {
    let cfg = builder.config().clone();

    builder.add_csr("ctrl", &layouts::CTRL)?;
    builder.add_csr("identifier_mem", &layouts::EXTERNAL)?;
    builder.add_csr("timer0", &layouts::TIMER)?;
    builder.add_interrupt("timer0")?;

    if with_uart {
        let serial = builder.platform_mut().request("serial", 0)?;
        debug!("Console UART on {}", serial.name);
        builder.add_csr("uart_phy", &layouts::UART_PHY)?;
        builder.add_csr("uart", &layouts::UART)?;
        builder.add_interrupt("uart")?;
    }

    builder.add_memory_region("rom", mem_map::ROM_BASE, cfg.integrated_rom_size);
    builder.add_memory_region("sram", mem_map::SRAM_BASE, cfg.integrated_sram_size);
    if cfg.integrated_main_ram_size != 0 {
        builder.add_memory_region(
            "main_ram",
            mem_map::MAIN_RAM_BASE,
            cfg.integrated_main_ram_size,
        );
    }
    builder.add_memory_region("csr", mem_map::CSR_BASE, mem_map::CSR_SIZE);

    builder.add_constant("CONFIG_CLOCK_FREQUENCY", ConstValue::Int(cfg.sys_clk_freq));
    builder.add_constant(
        "CONFIG_CSR_DATA_WIDTH",
        ConstValue::Int(cfg.csr_data_width as u64),
    );
    builder.add_constant("CONFIG_CSR_ALIGNMENT", ConstValue::Int(32));
    builder.add_constant(
        "CONFIG_BUS_STANDARD",
        ConstValue::Str("WISHBONE".to_string()),
    );
    builder.add_constant("CONFIG_BUS_DATA_WIDTH", ConstValue::Int(32));
    builder.add_constant("CONFIG_BUS_ADDRESS_WIDTH", ConstValue::Int(32));
    Ok(())
}

/// Clock input and reset pads, then the PLL for the requested domains
fn build_crg(builder: &mut SocBuilder, requests: &[DomainRequest]) -> Result<Crg, ConfigError> {
    let board = builder.platform_mut().board();
    builder
        .platform_mut()
        .request(board.default_clk_name, 0)?;
    builder.platform_mut().request(board.reset_name, 0)?;
    Crg::new(board.family, board.default_clk_freq_hz, requests)
}

fn compose_pcie(platform: Platform, config: SocConfig) -> Result<Soc, ConfigError> {
    let sys_clk_freq = config.sys_clk_freq;
    let with_pcie_uart = config.with_pcie_uart;
    let main_ram_size = config.integrated_main_ram_size;
    let sys4x_freq = sys_clk_freq
        .checked_mul(4)
        .ok_or_else(|| ConfigError::ClockUnreachable {
            domain: "sys4x".to_string(),
            freq_hz: u64::MAX,
        })?;
    let mut builder = SocBuilder::new(platform, config)?;

    base_soc(&mut builder, !with_pcie_uart)?;

    let crg = build_crg(
        &mut builder,
        &[
            DomainRequest {
                name: "sys",
                freq_hz: sys_clk_freq,
                reset_less: false,
            },
            DomainRequest {
                name: "sys4x",
                freq_hz: sys4x_freq,
                reset_less: true,
            },
            DomainRequest {
                name: "clk200",
                freq_hz: 200_000_000,
                reset_less: false,
            },
        ],
    )?;
    builder.add_csr("crg", &layouts::EXTERNAL)?;
    let sys = crg
        .domain("sys")
        .ok_or_else(|| ConfigError::ClockUnreachable {
            domain: "sys".to_string(),
            freq_hz: sys_clk_freq,
        })?
        .clone();

    builder.add_csr("dna", &layouts::DNA)?;
    builder.add_csr("xadc", &layouts::XADC)?;

    if main_ram_size == 0 {
        builder.platform_mut().request("ddram", 0)?;
        builder.add_csr("ddrphy", &layouts::EXTERNAL)?;
        builder.add_csr("sdram", &layouts::EXTERNAL)?;
        builder.add_memory_region(
            "main_ram",
            mem_map::MAIN_RAM_BASE,
            mem_map::MAIN_RAM_MAX_SIZE,
        );
    }

    builder.platform_mut().request("pcie_x1", 0)?;
    builder.add_csr("pcie_phy", &layouts::PCIE_PHY)?;
    builder.add_csr("pcie_dma", &layouts::EXTERNAL)?;
    builder.add_csr("pcie_msi", &msi::LAYOUT)?;
    let msi = Msi::new(&sys, MSI_LINES as u8);
    builder.add_msi("DMA_WRITER")?;
    builder.add_msi("DMA_READER")?;

    let pcie_uart = if with_pcie_uart {
        builder.add_csr("uart", &layouts::UART)?;
        builder.add_interrupt("uart")?;
        builder.add_csr("pcie_uart", &pcie_uart::LAYOUT)?;
        Some(PcieUart::new(&sys))
    } else {
        None
    };

    // Pads only, the heartbeat counter driving them is not modelled
    builder.platform_mut().request("rgb_led", 0)?;

    Ok(builder.finish(crg, pcie_uart, Some(msi)))
}

fn compose_serial(platform: Platform, config: SocConfig) -> Result<Soc, ConfigError> {
    let sys_clk_freq = config.sys_clk_freq;
    let main_ram_size = config.integrated_main_ram_size;
    let mut builder = SocBuilder::new(platform, config)?;

    base_soc(&mut builder, true)?;

    let crg = build_crg(
        &mut builder,
        &[
            DomainRequest {
                name: "sys",
                freq_hz: sys_clk_freq,
                reset_less: false,
            },
            DomainRequest {
                name: "sys_ps",
                freq_hz: sys_clk_freq,
                reset_less: false,
            },
        ],
    )?;

    if main_ram_size == 0 {
        builder.platform_mut().request("sdram_clock", 0)?;
        builder.platform_mut().request("sdram", 0)?;
        builder.add_csr("sdram", &layouts::EXTERNAL)?;
        builder.add_memory_region("main_ram", mem_map::MAIN_RAM_BASE, SDR_MAIN_RAM_SIZE);
    }

    for led in 0..USER_LEDS {
        if !builder.platform_mut().has_resource("user_led", led) {
            break;
        }
        builder.platform_mut().request("user_led", led)?;
    }
    builder.add_csr("leds", &layouts::LEDS)?;

    Ok(builder.finish(crg, None, None))
}
