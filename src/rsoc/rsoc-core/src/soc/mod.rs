//! SoC composition.
//!
//! A [`SocBuilder`] collects CSR regions, interrupt sources, constants and
//! memory regions in a fixed order; [`SocBuilder::finish`] freezes them into
//! a [`Soc`] whose maps no longer change.

mod bus;
mod config;
pub mod layouts;
mod targets;

pub use bus::CsrBus;
pub use config::SocConfig;
pub use targets::compose;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use log::info;

use crate::clock::Crg;
use crate::constants::{cpu_interrupts, mem_map, CPU_INTERRUPTS, MSI_LINES};
use crate::csr::{CsrDescriptor, CsrMap, CsrRegistry};
use crate::error::ConfigError;
use crate::interrupts::{CpuInterrupts, InterruptAllocator, InterruptMap};
use crate::msi::Msi;
use crate::pcie_uart::PcieUart;
use crate::platform::Platform;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstValue {
    Int(u64),
    Str(String),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{}", v),
            ConstValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    pub name: String,
    pub base: u32,
    pub size: u32,
}

pub struct SocBuilder {
    config: SocConfig,
    platform: Platform,
    csr: CsrRegistry,
    cpu_irqs: CpuInterrupts,
    msis: InterruptAllocator,
    constants: BTreeMap<String, ConstValue>,
    mem_regions: Vec<MemoryRegion>,
}

impl SocBuilder {
    pub fn new(platform: Platform, config: SocConfig) -> Result<Self, ConfigError> {
        if config.csr_data_width != 32 {
            return Err(ConfigError::InvalidCsrWidth(config.csr_data_width));
        }
        if config.sys_clk_freq == 0 {
            return Err(ConfigError::ClockUnreachable {
                domain: "sys".to_string(),
                freq_hz: 0,
            });
        }
        Ok(Self {
            config,
            platform,
            csr: CsrRegistry::new(mem_map::CSR_BASE),
            cpu_irqs: CpuInterrupts::new(&cpu_interrupts::RESERVED, CPU_INTERRUPTS),
            msis: InterruptAllocator::new(MSI_LINES),
            constants: BTreeMap::new(),
            mem_regions: Vec::new(),
        })
    }

    pub fn config(&self) -> &SocConfig {
        &self.config
    }

    pub fn platform_mut(&mut self) -> &mut Platform {
        &mut self.platform
    }

    pub fn add_csr(
        &mut self,
        name: &str,
        layout: &'static [CsrDescriptor],
    ) -> Result<(), ConfigError> {
        self.csr.add(name, layout).map(|_| ())
    }

    pub fn add_interrupt(&mut self, name: &str) -> Result<usize, ConfigError> {
        self.cpu_irqs.add(name)
    }

    pub fn add_msi(&mut self, name: &str) -> Result<(), ConfigError> {
        self.msis.add(name)
    }

    pub fn add_constant(&mut self, name: &str, value: ConstValue) {
        self.constants.insert(name.to_string(), value);
    }

    pub fn add_memory_region(&mut self, name: &str, base: u32, size: u32) {
        self.mem_regions.push(MemoryRegion {
            name: name.to_string(),
            base,
            size,
        });
    }

    /// Freezes every map and publishes the interrupt constants
    pub fn finish(mut self, crg: Crg, pcie_uart: Option<PcieUart>, msi: Option<Msi>) -> Soc {
        let cpu_interrupts = self.cpu_irqs.freeze();
        let msi_map = self.msis.freeze();
        for (name, idx) in cpu_interrupts.constants().chain(msi_map.constants()) {
            self.constants.insert(name, ConstValue::Int(idx as u64));
        }
        let csr_map = self.csr.freeze();
        info!(
            "SoC \"{}\": {} CSR regions, {} CPU interrupts, {} MSI vectors",
            self.config.ident,
            csr_map.regions().len(),
            cpu_interrupts.len(),
            msi_map.len()
        );

        Soc {
            config: self.config,
            platform: self.platform,
            crg,
            csr_map,
            cpu_interrupts,
            msi_map,
            constants: self.constants,
            mem_regions: self.mem_regions,
            pcie_uart,
            msi,
        }
    }
}

/// Composed SoC: frozen maps plus the blocks this crate models cycle by cycle
pub struct Soc {
    config: SocConfig,
    platform: Platform,
    crg: Crg,
    csr_map: CsrMap,
    cpu_interrupts: InterruptMap,
    msi_map: InterruptMap,
    constants: BTreeMap<String, ConstValue>,
    mem_regions: Vec<MemoryRegion>,
    pcie_uart: Option<PcieUart>,
    msi: Option<Msi>,
}

/// Simultaneous mutable access to the simulated blocks
pub struct SocParts<'a> {
    pub crg: &'a mut Crg,
    pub csr_map: &'a CsrMap,
    pub pcie_uart: Option<&'a mut PcieUart>,
    pub msi: Option<&'a mut Msi>,
    pub msi_map: &'a InterruptMap,
}

impl Soc {
    pub fn config(&self) -> &SocConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn crg(&self) -> &Crg {
        &self.crg
    }

    pub fn csr_map(&self) -> &CsrMap {
        &self.csr_map
    }

    pub fn cpu_interrupts(&self) -> &InterruptMap {
        &self.cpu_interrupts
    }

    pub fn msi_map(&self) -> &InterruptMap {
        &self.msi_map
    }

    pub fn constants(&self) -> &BTreeMap<String, ConstValue> {
        &self.constants
    }

    pub fn memory_regions(&self) -> &[MemoryRegion] {
        &self.mem_regions
    }

    pub fn pcie_uart(&self) -> Option<&PcieUart> {
        self.pcie_uart.as_ref()
    }

    pub fn msi(&self) -> Option<&Msi> {
        self.msi.as_ref()
    }

    pub fn parts_mut(&mut self) -> SocParts<'_> {
        SocParts {
            crg: &mut self.crg,
            csr_map: &self.csr_map,
            pcie_uart: self.pcie_uart.as_mut(),
            msi: self.msi.as_mut(),
            msi_map: &self.msi_map,
        }
    }
}
