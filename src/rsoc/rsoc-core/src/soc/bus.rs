use log::{debug, error};

use crate::csr::{CsrBank, CsrMap, HostBus};
use crate::msi::Msi;
use crate::pcie_uart::PcieUart;

/// Routes host accesses through the frozen CSR map to the modelled banks.
///
/// Pages of blocks without a model read as zero and drop writes.
pub struct CsrBus<'a> {
    map: &'a CsrMap,
    pcie_uart: Option<&'a mut PcieUart>,
    msi: Option<&'a mut Msi>,
}

impl<'a> CsrBus<'a> {
    pub fn new(
        map: &'a CsrMap,
        pcie_uart: Option<&'a mut PcieUart>,
        msi: Option<&'a mut Msi>,
    ) -> Self {
        Self {
            map,
            pcie_uart,
            msi,
        }
    }

    fn bank(&mut self, region: &str) -> Option<&mut dyn CsrBank> {
        match region {
            "pcie_uart" => self.pcie_uart.as_deref_mut().map(|b| b as &mut dyn CsrBank),
            "pcie_msi" => self.msi.as_deref_mut().map(|b| b as &mut dyn CsrBank),
            _ => None,
        }
    }
}

impl HostBus for CsrBus<'_> {
    fn read(&mut self, addr: u32) -> u32 {
        let map = self.map;
        let (region, offset) = match map.decode(addr) {
            Some(hit) => hit,
            None => {
                error!("Unmapped CSR read at 0x{:08x}", addr);
                return 0;
            }
        };
        match self.bank(&region.name) {
            Some(bank) => bank.read(offset),
            None => {
                debug!("No model behind {} for read at 0x{:08x}", region.name, addr);
                0
            }
        }
    }

    fn write(&mut self, addr: u32, value: u32) {
        let map = self.map;
        let (region, offset) = match map.decode(addr) {
            Some(hit) => hit,
            None => {
                error!("Unmapped CSR write at 0x{:08x}", addr);
                return;
            }
        };
        match self.bank(&region.name) {
            Some(bank) => bank.write(offset, value),
            None => debug!("No model behind {}, dropped write at 0x{:08x}", region.name, addr),
        }
    }
}
