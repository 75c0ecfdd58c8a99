use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::debug;

use super::CsrDescriptor;
use crate::constants::CSR_WORD_BYTES;
use crate::constants::{csr_locations, CSR_MAX_REGIONS, CSR_REGION_PAGE};
use crate::error::ConfigError;

/// One block's page in the CSR window
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrRegion {
    pub name: String,
    pub index: usize,
    pub base: u32,
    pub registers: &'static [CsrDescriptor],
}

impl CsrRegion {
    /// Registers with their absolute bus addresses, in layout order.
    /// Registers wider than one bus word take consecutive words.
    pub fn registers(&self) -> impl Iterator<Item = (u32, &CsrDescriptor)> + '_ {
        self.registers.iter().scan(self.base, |addr, desc| {
            let at = *addr;
            *addr += (desc.words() * CSR_WORD_BYTES) as u32;
            Some((at, desc))
        })
    }

    pub fn find(&self, register: &str) -> Option<(u32, &CsrDescriptor)> {
        self.registers().find(|(_, desc)| desc.name == register)
    }
}

/// Name-ordered CSR region registry, populated while composing and then frozen.
pub struct CsrRegistry {
    csr_base: u32,
    reserved: BTreeMap<&'static str, usize>,
    regions: BTreeMap<String, CsrRegion>,
    used: [bool; CSR_MAX_REGIONS],
}

impl CsrRegistry {
    pub fn new(csr_base: u32) -> Self {
        Self {
            csr_base,
            reserved: csr_locations::RESERVED.iter().copied().collect(),
            regions: BTreeMap::new(),
            used: [false; CSR_MAX_REGIONS],
        }
    }

    fn is_reserved(&self, index: usize) -> bool {
        self.reserved.values().any(|&reserved| reserved == index)
    }

    /// Registers `name` at its reserved location, or at the lowest free one.
    pub fn add(
        &mut self,
        name: &str,
        registers: &'static [CsrDescriptor],
    ) -> Result<&CsrRegion, ConfigError> {
        if self.regions.contains_key(name) {
            return Err(ConfigError::DuplicateCsr(name.to_string()));
        }

        let index = match self.reserved.get(name) {
            Some(&index) => index,
            None => (0..CSR_MAX_REGIONS)
                .find(|&idx| !self.used[idx] && !self.is_reserved(idx))
                .ok_or_else(|| ConfigError::CsrSpaceExhausted(name.to_string()))?,
        };
        self.used[index] = true;

        let region = CsrRegion {
            name: name.to_string(),
            index,
            base: self.csr_base + index as u32 * CSR_REGION_PAGE,
            registers,
        };
        debug!("CSR region {} at index {} (0x{:08x})", name, index, region.base);
        Ok(self.regions.entry(name.to_string()).or_insert(region))
    }

    pub fn freeze(self) -> CsrMap {
        let mut regions: Vec<CsrRegion> = self.regions.into_values().collect();
        regions.sort_by_key(|r| r.index);
        CsrMap {
            csr_base: self.csr_base,
            regions,
        }
    }
}

/// Frozen CSR map, ordered by location
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrMap {
    csr_base: u32,
    regions: Vec<CsrRegion>,
}

impl CsrMap {
    pub fn csr_base(&self) -> u32 {
        self.csr_base
    }

    pub fn regions(&self) -> &[CsrRegion] {
        &self.regions
    }

    pub fn get(&self, name: &str) -> Option<&CsrRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Splits a bus address into its region and the byte offset inside it
    pub fn decode(&self, addr: u32) -> Option<(&CsrRegion, usize)> {
        let rel = addr.checked_sub(self.csr_base)?;
        let index = (rel / CSR_REGION_PAGE) as usize;
        let offset = (rel % CSR_REGION_PAGE) as usize;
        self.regions
            .iter()
            .find(|r| r.index == index)
            .map(|r| (r, offset))
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;
    use crate::csr::CsrDescriptor;

    static ONE_REG: [CsrDescriptor; 1] = [CsrDescriptor::status("id", 32)];
    static WIDE: [CsrDescriptor; 2] = [
        CsrDescriptor::status("id", 57),
        CsrDescriptor::status("temperature", 12),
    ];

    #[test]
    fn test_reserved_and_free_locations() {
        let mut reg = CsrRegistry::new(0x8000_0000);
        reg.add("ctrl", &[]).unwrap();
        assert_eq!(reg.add("dna", &ONE_REG).unwrap().index, 10);
        assert_eq!(reg.add("uart", &[]).unwrap().index, 3);
        assert_eq!(reg.add("xadc", &[]).unwrap().base, 0x8000_0000 + 11 * 0x800);

        let map = reg.freeze();
        let names: Vec<&str> = map.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["ctrl", "uart", "dna", "xadc"]);
    }

    #[test]
    fn test_duplicate_region() {
        let mut reg = CsrRegistry::new(0);
        reg.add("pcie_dma", &[]).unwrap();
        assert_eq!(
            reg.add("pcie_dma", &[]).unwrap_err(),
            ConfigError::DuplicateCsr("pcie_dma".to_string())
        );
    }

    #[test]
    fn test_space_exhausted() {
        let mut reg = CsrRegistry::new(0);
        let names = [
            "a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8", "a9", "a10", "a11", "a12",
            "a13", "a14", "a15", "a16", "a17", "a18", "a19", "a20", "a21",
        ];
        for name in names.iter() {
            reg.add(name, &[]).unwrap();
        }
        assert_eq!(
            reg.add("one_too_many", &[]).unwrap_err(),
            ConfigError::CsrSpaceExhausted("one_too_many".to_string())
        );
    }

    #[test]
    fn test_decode() {
        let mut reg = CsrRegistry::new(0x8000_0000);
        reg.add("dna", &ONE_REG).unwrap();
        let map = reg.freeze();
        let (region, offset) = map.decode(0x8000_5004).unwrap();
        assert_eq!(region.name, "dna");
        assert_eq!(offset, 4);
        assert!(map.decode(0x8000_0000).is_none());
        assert!(map.decode(0x10).is_none());
        assert_eq!(region.find("id").unwrap().0, 0x8000_5000);
    }

    #[test]
    fn test_wide_register_spans_words() {
        let mut reg = CsrRegistry::new(0);
        let region = reg.add("dna", &WIDE).unwrap();
        let addrs: Vec<u32> = region.registers().map(|(addr, _)| addr - region.base).collect();
        assert_eq!(addrs, [0x0, 0x8]);
    }
}
