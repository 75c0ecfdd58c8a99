pub mod registry;

pub use registry::{CsrMap, CsrRegion, CsrRegistry};

/// How a control/status register behaves on the bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrKind {
    Status,  // Read-only, driven by logic
    Strobe,  // Write pulses an action, reads as zero
    Storage, // Read/write storage
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::ReadOnly => "ro",
            Access::ReadWrite => "rw",
        }
    }
}

/// Static layout entry for one register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CsrDescriptor {
    pub name: &'static str,
    pub kind: CsrKind,
    pub width: u8,
}

impl CsrDescriptor {
    pub const fn status(name: &'static str, width: u8) -> Self {
        Self {
            name,
            kind: CsrKind::Status,
            width,
        }
    }

    pub const fn strobe(name: &'static str, width: u8) -> Self {
        Self {
            name,
            kind: CsrKind::Strobe,
            width,
        }
    }

    pub const fn storage(name: &'static str, width: u8) -> Self {
        Self {
            name,
            kind: CsrKind::Storage,
            width,
        }
    }

    pub fn access(&self) -> Access {
        match self.kind {
            CsrKind::Status => Access::ReadOnly,
            CsrKind::Strobe | CsrKind::Storage => Access::ReadWrite,
        }
    }

    pub fn mask(&self) -> u32 {
        width_mask(self.width)
    }

    /// Bus words the register spans
    pub fn words(&self) -> usize {
        (self.width as usize + 31) / 32
    }
}

pub fn width_mask(width: u8) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Register bank reachable from the host bus.
///
/// Offsets are byte offsets within the bank's CSR region.
pub trait CsrBank {
    fn layout(&self) -> &'static [CsrDescriptor];
    fn read(&self, offset: usize) -> u32;
    fn write(&mut self, offset: usize, value: u32);
}

/// The CSR window as the host sees it: absolute bus addresses
pub trait HostBus {
    fn read(&mut self, addr: u32) -> u32;
    fn write(&mut self, addr: u32, value: u32);
}

/// Write-strobe register:a bus write raises `re` for exactly the cycle of the write.
#[derive(Clone, Copy, Debug, Default)]
pub struct Strobe {
    re: bool,
    r: u32, // Value carried by the write
}

impl Strobe {
    pub const fn new() -> Self {
        Self { re: false, r: 0 }
    }

    pub fn write(&mut self, value: u32) {
        self.re = true;
        self.r = value;
    }

    pub fn re(&self) -> bool {
        self.re
    }

    /// Written value, valid while `re` is high
    pub fn r(&self) -> u32 {
        if self.re {
            self.r
        } else {
            0
        }
    }

    /// Clock edge: the pulse is over
    pub fn end_cycle(&mut self) {
        self.re = false;
        self.r = 0;
    }
}

/// Read/write storage register. Writes take effect at the next clock edge.
#[derive(Clone, Copy, Debug)]
pub struct Storage {
    storage: u32,
    staged: Option<u32>,
    reset_value: u32,
    mask: u32,
}

impl Storage {
    pub fn new(width: u8, reset_value: u32) -> Self {
        let mask = width_mask(width);
        Self {
            storage: reset_value & mask,
            staged: None,
            reset_value: reset_value & mask,
            mask,
        }
    }

    pub fn write(&mut self, value: u32) {
        self.staged = Some(value & self.mask);
    }

    pub fn storage(&self) -> u32 {
        self.storage
    }

    /// Pulses on the cycle a write is issued
    pub fn re(&self) -> bool {
        self.staged.is_some()
    }

    pub fn commit(&mut self) {
        if let Some(value) = self.staged.take() {
            self.storage = value;
        }
    }

    pub fn reset(&mut self) {
        self.storage = self.reset_value;
        self.staged = None;
    }
}
