use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::{String, ToString};

use crate::error::ConfigError;

/// Collects named interrupt sources while the SoC is being composed
pub struct InterruptAllocator {
    names: BTreeSet<String>,
    capacity: usize,
}

impl InterruptAllocator {
    pub fn new(capacity: usize) -> Self {
        Self {
            names: BTreeSet::new(),
            capacity,
        }
    }

    pub fn add(&mut self, name: &str) -> Result<(), ConfigError> {
        if self.names.contains(name) {
            return Err(ConfigError::DuplicateInterrupt(name.to_string()));
        }
        if self.names.len() >= self.capacity {
            return Err(ConfigError::InterruptSpaceExhausted(name.to_string()));
        }
        self.names.insert(name.to_string());
        Ok(())
    }

    /// Assigns indices 0..N-1 in ascending name order. The result is immutable.
    pub fn freeze(self) -> InterruptMap {
        InterruptMap {
            indices: self
                .names
                .into_iter()
                .enumerate()
                .map(|(idx, name)| (name, idx))
                .collect(),
        }
    }
}

/// Dense, name-ordered interrupt index assignment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterruptMap {
    indices: BTreeMap<String, usize>,
}

impl InterruptMap {
    pub fn index(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// (name, index) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.indices.iter().map(|(name, &idx)| (name.as_str(), idx))
    }

    /// Published constants: `<NAME>_INTERRUPT = index`
    pub fn constants(&self) -> impl Iterator<Item = (String, usize)> + '_ {
        self.iter()
            .map(|(name, idx)| (format!("{}_INTERRUPT", name.to_uppercase()), idx))
    }

    /// Drives line `i` from the source mapped to index `i`
    pub fn gather<F>(&self, mut level: F) -> u32
    where
        F: FnMut(&str) -> bool,
    {
        self.iter()
            .filter(|&(name, _)| level(name))
            .fold(0, |lines, (_, idx)| lines | (1 << idx))
    }
}

/// CPU interrupt lines: standard blocks keep their reserved numbers,
/// everything else takes the lowest free line.
pub struct CpuInterrupts {
    reserved: BTreeMap<&'static str, usize>,
    assigned: BTreeMap<String, usize>,
    capacity: usize,
}

impl CpuInterrupts {
    pub fn new(reserved: &[(&'static str, usize)], capacity: usize) -> Self {
        Self {
            reserved: reserved.iter().copied().collect(),
            assigned: BTreeMap::new(),
            capacity,
        }
    }

    pub fn add(&mut self, name: &str) -> Result<usize, ConfigError> {
        if self.assigned.contains_key(name) {
            return Err(ConfigError::DuplicateInterrupt(name.to_string()));
        }
        let taken = |idx: usize| {
            self.assigned.values().any(|&used| used == idx)
                || self.reserved.values().any(|&held| held == idx)
        };
        let index = match self.reserved.get(name) {
            Some(&idx) => idx,
            None => (0..self.capacity)
                .find(|&idx| !taken(idx))
                .ok_or_else(|| ConfigError::InterruptSpaceExhausted(name.to_string()))?,
        };
        self.assigned.insert(name.to_string(), index);
        Ok(index)
    }

    pub fn freeze(self) -> InterruptMap {
        InterruptMap {
            indices: self.assigned,
        }
    }
}

#[cfg(test)]
mod interrupt_tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_lexicographic_indices() {
        let mut alloc = InterruptAllocator::new(32);
        alloc.add("DMA_WRITER").unwrap();
        alloc.add("DMA_READER").unwrap();
        let map = alloc.freeze();

        assert_eq!(map.index("DMA_READER"), Some(0));
        assert_eq!(map.index("DMA_WRITER"), Some(1));
        let consts: Vec<(String, usize)> = map.constants().collect();
        assert_eq!(
            consts,
            [
                ("DMA_READER_INTERRUPT".to_string(), 0),
                ("DMA_WRITER_INTERRUPT".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let build = |names: &[&str]| {
            let mut alloc = InterruptAllocator::new(32);
            for name in names {
                alloc.add(name).unwrap();
            }
            alloc.freeze()
        };
        assert_eq!(
            build(&["c", "a", "b"]),
            build(&["b", "c", "a"])
        );
    }

    #[test]
    fn test_duplicate_and_capacity() {
        let mut alloc = InterruptAllocator::new(1);
        alloc.add("DMA_WRITER").unwrap();
        assert_eq!(
            alloc.add("DMA_WRITER").unwrap_err(),
            ConfigError::DuplicateInterrupt("DMA_WRITER".to_string())
        );
        assert_eq!(
            alloc.add("DMA_READER").unwrap_err(),
            ConfigError::InterruptSpaceExhausted("DMA_READER".to_string())
        );
    }

    #[test]
    fn test_gather_routes_by_index() {
        let mut alloc = InterruptAllocator::new(32);
        alloc.add("DMA_WRITER").unwrap();
        alloc.add("DMA_READER").unwrap();
        let map = alloc.freeze();

        assert_eq!(map.gather(|name| name == "DMA_WRITER"), 0b10);
        assert_eq!(map.gather(|name| name == "DMA_READER"), 0b01);
        assert_eq!(map.gather(|_| false), 0);
    }

    #[test]
    fn test_cpu_reserved_lines() {
        let mut cpu = CpuInterrupts::new(&[("timer0", 1), ("uart", 2)], 32);
        assert_eq!(cpu.add("uart").unwrap(), 2);
        assert_eq!(cpu.add("ethmac").unwrap(), 0);
        assert_eq!(cpu.add("spi").unwrap(), 3);
        let map = cpu.freeze();
        assert_eq!(map.index("uart"), Some(2));
        assert_eq!(map.index("timer0"), None);
    }
}
