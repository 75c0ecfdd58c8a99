//! Cycle loop tying the bridge, the MSI controller and their collaborators
//! together.
//!
//! Each cycle: the PHY drives its side of the UART channels, the host driver
//! makes at most one register access, interrupt lines are sampled, then the
//! bridge and MSI controller evaluate and the sys domain takes its edge.
//! Host accesses, MSI enable and acknowledge included, go through the CSR
//! map by absolute address.

use anyhow::{anyhow, bail, Result};
use log::info;

use rsoc_core::constants::msi::{CLEAR as MSI_CLEAR, ENABLE as MSI_ENABLE};
use rsoc_core::csr::HostBus;
use rsoc_core::periph::{IrqSource, UartPhy};
use rsoc_core::soc::{CsrBus, Soc};
use rsoc_peripherals::host::UartHost;
use rsoc_peripherals::irq::PeriodicIrq;

// Power-on reset held on every domain before the host starts
const RESET_CYCLES: u64 = 4;

// MSI source N fires every (N + 1) * IRQ_PERIOD sys cycles
const IRQ_PERIOD: u64 = 10_000;

pub struct Simulator {
    soc: Soc,
    phy: Box<dyn UartPhy>,
    host: UartHost,
    msi_base: Option<u32>,
    irqs: Vec<PeriodicIrq>,
    cycle: u64,
    msi_messages: u64,
}

impl Simulator {
    pub fn new(soc: Soc, phy: Box<dyn UartPhy>) -> Result<Self> {
        let uart_base = match (soc.pcie_uart(), soc.csr_map().get("pcie_uart")) {
            (Some(_), Some(region)) => region.base,
            _ => bail!("SoC has no PCIe UART to simulate"),
        };
        let msi_base = soc.csr_map().get("pcie_msi").map(|region| region.base);
        if soc.crg().domain("sys").is_none() {
            bail!("SoC has no sys clock domain");
        }
        let irqs = soc
            .msi_map()
            .iter()
            .map(|(name, idx)| PeriodicIrq::new(name, IRQ_PERIOD * (idx as u64 + 1)))
            .collect();
        Ok(Self {
            soc,
            phy,
            host: UartHost::new(uart_base),
            msi_base,
            irqs,
            cycle: 0,
            msi_messages: 0,
        })
    }

    pub fn host_mut(&mut self) -> &mut UartHost {
        &mut self.host
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn msi_messages(&self) -> u64 {
        self.msi_messages
    }

    pub fn step(&mut self) -> Result<()> {
        let in_reset = self.cycle < RESET_CYCLES;
        let parts = self.soc.parts_mut();
        let uart = parts
            .pcie_uart
            .ok_or_else(|| anyhow!("PCIe UART disappeared"))?;
        let mut msi = parts.msi;
        let crg = parts.crg;
        crg.set_reset(in_reset);

        let (sink, source) = uart.endpoints_mut();
        self.phy.drive(sink, source);
        if !in_reset {
            let mut bus = CsrBus::new(parts.csr_map, Some(&mut *uart), msi.as_deref_mut());
            self.host.step(&mut bus);
            if self.cycle == RESET_CYCLES {
                if let Some(base) = self.msi_base {
                    bus.write(base + MSI_ENABLE as u32, u32::MAX);
                }
            }
        }

        let irqs = &mut self.irqs;
        let lines = parts.msi_map.gather(|name| {
            irqs.iter_mut()
                .find(|irq| irq.name() == name)
                .map_or(false, |irq| irq.is_interrupt())
        });

        {
            let sys = crg
                .domain("sys")
                .ok_or_else(|| anyhow!("SoC has no sys clock domain"))?;
            let bridge = uart.tick(sys);
            self.phy.complete(&bridge);
            if let Some(msi) = msi.as_mut() {
                msi.tick(sys, lines);
            }
        }
        if let Some(sys) = crg.domain_mut("sys") {
            sys.advance();
        }

        // Host interrupt handler: acknowledge each message as it arrives
        if let (Some(msi), Some(base)) = (msi, self.msi_base) {
            while let Some(vector) = msi.pop_message() {
                info!("MSI vector {} at cycle {}", vector, self.cycle);
                CsrBus::new(parts.csr_map, None, Some(&mut *msi))
                    .write(base + MSI_CLEAR as u32, 1 << vector);
                self.msi_messages += 1;
            }
        }

        self.cycle += 1;
        Ok(())
    }
}
