use alloc::string::{String, ToString};
use heapless::Deque;
use log::{debug, error, warn};

use crate::clock::ClockDomain;
use crate::constants::msi::*;
use crate::constants::MSI_QUEUE_DEPTH;
use crate::csr::{width_mask, CsrBank, CsrDescriptor, Storage, Strobe};

pub static LAYOUT: [CsrDescriptor; 3] = [
    CsrDescriptor::storage("enable", 32),
    CsrDescriptor::strobe("clear", 32),
    CsrDescriptor::status("vector", 32),
];

/// Message-signalled interrupt controller.
///
/// Interrupt lines latch into `vector`. Each newly pending, enabled line is
/// signalled once as a message carrying its index; the host acknowledges by
/// writing the bit to `clear`.
pub struct Msi {
    domain: String,
    mask: u32,
    enable: Storage,
    clear: Strobe,
    vector: u32,
    signalled: u32, // Pending bits already sent as a message
    outbox: Deque<u8, MSI_QUEUE_DEPTH>,
}

impl Msi {
    pub fn new(cd: &ClockDomain, width: u8) -> Self {
        Self {
            domain: cd.name().to_string(),
            mask: width_mask(width),
            enable: Storage::new(width, 0),
            clear: Strobe::new(),
            vector: 0,
            signalled: 0,
            outbox: Deque::new(),
        }
    }

    pub fn vector(&self) -> u32 {
        self.vector
    }

    /// Transport side: next message waiting to go out
    pub fn pop_message(&mut self) -> Option<u8> {
        self.outbox.pop_front()
    }

    pub fn tick(&mut self, cd: &ClockDomain, lines: u32) -> Option<u8> {
        debug_assert_eq!(cd.name(), self.domain);

        if cd.in_reset() {
            self.enable.reset();
            self.clear.end_cycle();
            self.vector = 0;
            self.signalled = 0;
            self.outbox.clear();
            return None;
        }

        let cleared = self.clear.r();
        self.vector = ((self.vector & !cleared) | lines) & self.mask;
        self.signalled &= self.vector & !cleared;

        let fresh = self.vector & self.enable.storage() & !self.signalled;
        let mut sent = None;
        if fresh != 0 {
            let index = fresh.trailing_zeros() as u8;
            match self.outbox.push_back(index) {
                Ok(()) => {
                    debug!("MSI: signalling vector {}", index);
                    self.signalled |= 1 << index;
                    sent = Some(index);
                }
                Err(_) => warn!("MSI: outbox full, vector {} stays pending", index),
            }
        }

        self.enable.commit();
        self.clear.end_cycle();
        sent
    }
}

impl CsrBank for Msi {
    fn layout(&self) -> &'static [CsrDescriptor] {
        &LAYOUT
    }

    fn read(&self, offset: usize) -> u32 {
        match offset {
            ENABLE => self.enable.storage(),
            CLEAR => 0,
            VECTOR => self.vector,
            _ => {
                error!("Unmapped pcie_msi read at offset 0x{:x}", offset);
                0
            }
        }
    }

    fn write(&mut self, offset: usize, value: u32) {
        match offset {
            ENABLE => self.enable.write(value),
            CLEAR => self.clear.write(value),
            VECTOR => warn!("Write attempt to read-only pcie_msi vector"),
            _ => error!("Unmapped pcie_msi write at offset 0x{:x}", offset),
        }
    }
}

#[cfg(test)]
mod msi_tests {
    use super::*;

    fn setup() -> (ClockDomain, Msi) {
        let cd = ClockDomain::new("sys", 100_000_000);
        let mut msi = Msi::new(&cd, 32);
        msi.write(ENABLE, 0b11);
        msi.tick(&cd, 0);
        (cd, msi)
    }

    #[test]
    fn test_disabled_lines_latch_silently() {
        let cd = ClockDomain::new("sys", 100_000_000);
        let mut msi = Msi::new(&cd, 32);
        assert_eq!(msi.tick(&cd, 0b1), None);
        assert_eq!(msi.read(VECTOR), 0b1);
        assert_eq!(msi.pop_message(), None);

        // Enabling later signals the already pending line
        msi.write(ENABLE, 0b1);
        assert_eq!(msi.tick(&cd, 0), None);
        assert_eq!(msi.tick(&cd, 0), Some(0));
    }

    #[test]
    fn test_one_message_per_pending_line() {
        let (cd, mut msi) = setup();
        assert_eq!(msi.tick(&cd, 0b10), Some(1));
        assert_eq!(msi.tick(&cd, 0b10), None);
        assert_eq!(msi.tick(&cd, 0), None);
        assert_eq!(msi.pop_message(), Some(1));
        assert_eq!(msi.pop_message(), None);
    }

    #[test]
    fn test_lowest_index_first() {
        let (cd, mut msi) = setup();
        assert_eq!(msi.tick(&cd, 0b11), Some(0));
        assert_eq!(msi.tick(&cd, 0), Some(1));
        assert_eq!(msi.read(VECTOR), 0b11);
    }

    #[test]
    fn test_clear_rearms_line() {
        let (cd, mut msi) = setup();
        msi.tick(&cd, 0b1);
        msi.write(CLEAR, 0b1);
        msi.tick(&cd, 0);
        assert_eq!(msi.read(VECTOR), 0);

        assert_eq!(msi.tick(&cd, 0b1), Some(0));
        assert_eq!(msi.pop_message(), Some(0));
        assert_eq!(msi.pop_message(), Some(0));
    }

    #[test]
    fn test_full_outbox_keeps_vector_pending() {
        let cd = ClockDomain::new("sys", 100_000_000);
        let mut msi = Msi::new(&cd, 32);
        msi.write(ENABLE, u32::MAX);
        msi.tick(&cd, 0);
        for line in 0..MSI_QUEUE_DEPTH {
            assert_eq!(msi.tick(&cd, 1 << line), Some(line as u8));
        }
        let overflow = 1 << MSI_QUEUE_DEPTH;
        assert_eq!(msi.tick(&cd, overflow), None);

        msi.pop_message();
        assert_eq!(msi.tick(&cd, 0), Some(MSI_QUEUE_DEPTH as u8));
    }
}
