use rsoc_core::periph::IrqSource;

/// Raises its line for one cycle every `period` cycles
pub struct PeriodicIrq {
    name: String,
    period: u64,
    count: u64,
}

impl PeriodicIrq {
    pub fn new(name: &str, period: u64) -> Self {
        Self {
            name: name.to_string(),
            period: period.max(1),
            count: 0,
        }
    }
}

impl IrqSource for PeriodicIrq {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_interrupt(&mut self) -> bool {
        self.count += 1;
        if self.count == self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod irq_tests {
    use super::*;

    #[test]
    fn test_period() {
        let mut irq = PeriodicIrq::new("DMA_WRITER", 3);
        let levels: Vec<bool> = (0..6).map(|_| irq.is_interrupt()).collect();
        assert_eq!(levels, [false, false, true, false, false, true]);
        assert_eq!(irq.name(), "DMA_WRITER");
    }
}
