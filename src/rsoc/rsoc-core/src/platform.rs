//! Board description types and pin requests.
//!
//! Boards are plain data: every board variant is a table of I/O resources
//! rather than its own type.

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::debug;

use crate::clock::PllFamily;
use crate::error::ConfigError;

/// Electrical standard of a pad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoStandard {
    Lvcmos33,
    Lvcmos33D,
    Lvcmos25,
    Lvcmos15,
    Sstl15,
    DiffSstl15,
    Lvds25,
}

impl IoStandard {
    pub fn as_str(self) -> &'static str {
        match self {
            IoStandard::Lvcmos33 => "LVCMOS33",
            IoStandard::Lvcmos33D => "LVCMOS33D",
            IoStandard::Lvcmos25 => "LVCMOS25",
            IoStandard::Lvcmos15 => "LVCMOS15",
            IoStandard::Sstl15 => "SSTL15",
            IoStandard::DiffSstl15 => "DIFF_SSTL15",
            IoStandard::Lvds25 => "LVDS_25",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subsignal {
    pub name: &'static str,
    pub pins: &'static str, // Space separated, bit 0 first
    pub iostandard: Option<IoStandard>,
    pub misc: &'static [&'static str],
}

impl Subsignal {
    pub const fn new(name: &'static str, pins: &'static str) -> Self {
        Self {
            name,
            pins,
            iostandard: None,
            misc: &[],
        }
    }

    pub const fn iostandard(self, iostandard: IoStandard) -> Self {
        Self {
            iostandard: Some(iostandard),
            ..self
        }
    }

    pub const fn misc(self, misc: &'static [&'static str]) -> Self {
        Self { misc, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Pins(&'static str),
    Subsignals(&'static [Subsignal]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IoResource {
    pub name: &'static str,
    pub number: u8,
    pub signal: Signal,
    pub iostandard: Option<IoStandard>,
    pub misc: &'static [&'static str],
}

impl IoResource {
    pub const fn pins(name: &'static str, number: u8, pins: &'static str) -> Self {
        Self {
            name,
            number,
            signal: Signal::Pins(pins),
            iostandard: None,
            misc: &[],
        }
    }

    pub const fn subsignals(name: &'static str, number: u8, subs: &'static [Subsignal]) -> Self {
        Self {
            name,
            number,
            signal: Signal::Subsignals(subs),
            iostandard: None,
            misc: &[],
        }
    }

    pub const fn iostandard(self, iostandard: IoStandard) -> Self {
        Self {
            iostandard: Some(iostandard),
            ..self
        }
    }

    pub const fn misc(self, misc: &'static [&'static str]) -> Self {
        Self { misc, ..self }
    }
}

/// One pad of a requested resource, ready for constraint output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinAssignment {
    pub port: String,
    pub pin: &'static str,
    pub iostandard: Option<IoStandard>,
    pub misc: Vec<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Programmer {
    UjProg,
    Vivado,
}

impl Programmer {
    pub fn as_str(self) -> &'static str {
        match self {
            Programmer::UjProg => "ujprog",
            Programmer::Vivado => "vivado",
        }
    }
}

/// SoC composition a board is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    SerialSoc, // CPU console on the board UART
    PcieSoc,   // Host access through PCIe
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Revision {
    pub name: &'static str,
    pub io: &'static [IoResource],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub name: &'static str,
    pub family: PllFamily,
    pub target: TargetKind,
    pub devices: &'static [&'static str],
    pub default_device: &'static str,
    pub package: &'static str,
    pub revisions: &'static [Revision],
    pub default_revision: &'static str,
    pub io: &'static [IoResource],
    pub default_clk_name: &'static str,
    pub default_clk_freq_hz: u64,
    pub reset_name: &'static str,
    pub toolchain: &'static str,
    pub programmer: Programmer,
}

/// A board bound to one device and revision, handing out each resource once
pub struct Platform {
    board: &'static Board,
    device: &'static str,
    revision: &'static Revision,
    requested: BTreeSet<(&'static str, u8)>,
    order: Vec<&'static IoResource>,
}

impl Platform {
    pub fn new(
        board: &'static Board,
        device: Option<&str>,
        revision: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let device_name = device.unwrap_or(board.default_device);
        let device = board
            .devices
            .iter()
            .copied()
            .find(|&d| d == device_name)
            .ok_or_else(|| ConfigError::UnsupportedDevice {
                board: board.name.to_string(),
                device: device_name.to_string(),
            })?;

        let revision_name = revision.unwrap_or(board.default_revision);
        let revision = board
            .revisions
            .iter()
            .find(|r| r.name == revision_name)
            .ok_or_else(|| ConfigError::UnsupportedRevision {
                board: board.name.to_string(),
                revision: revision_name.to_string(),
            })?;

        Ok(Self {
            board,
            device,
            revision,
            requested: BTreeSet::new(),
            order: Vec::new(),
        })
    }

    pub fn board(&self) -> &'static Board {
        self.board
    }

    pub fn device(&self) -> &'static str {
        self.device
    }

    pub fn revision(&self) -> &'static str {
        self.revision.name
    }

    /// Full part number handed to the toolchain
    pub fn part(&self) -> String {
        format!("{}{}", self.device, self.board.package)
    }

    fn lookup(&self, name: &str, number: u8) -> Option<&'static IoResource> {
        self.board
            .io
            .iter()
            .chain(self.revision.io.iter())
            .find(|io| io.name == name && io.number == number)
    }

    pub fn has_resource(&self, name: &str, number: u8) -> bool {
        self.lookup(name, number).is_some()
    }

    pub fn request(&mut self, name: &str, number: u8) -> Result<&'static IoResource, ConfigError> {
        let io = self
            .lookup(name, number)
            .ok_or_else(|| ConfigError::UnknownResource {
                name: name.to_string(),
                number,
            })?;
        if !self.requested.insert((io.name, io.number)) {
            return Err(ConfigError::ResourceTaken {
                name: name.to_string(),
                number,
            });
        }
        debug!("Requested {}:{}", name, number);
        self.order.push(io);
        Ok(io)
    }

    /// Requested resources in request order
    pub fn requested(&self) -> &[&'static IoResource] {
        &self.order
    }

    fn instances(&self, name: &str) -> usize {
        self.board
            .io
            .iter()
            .chain(self.revision.io.iter())
            .filter(|io| io.name == name)
            .count()
    }

    /// Port-level pin list for every requested resource
    pub fn assignments(&self) -> Vec<PinAssignment> {
        let mut pins = Vec::new();
        for io in self.order.iter() {
            let stem = if self.instances(io.name) > 1 {
                format!("{}{}", io.name, io.number)
            } else {
                io.name.to_string()
            };
            match io.signal {
                Signal::Pins(list) => {
                    push_pins(&mut pins, &stem, list, io.iostandard, io.misc, &[]);
                }
                Signal::Subsignals(subs) => {
                    for sub in subs.iter() {
                        let port = format!("{}_{}", stem, sub.name);
                        push_pins(
                            &mut pins,
                            &port,
                            sub.pins,
                            sub.iostandard.or(io.iostandard),
                            io.misc,
                            sub.misc,
                        );
                    }
                }
            }
        }
        pins
    }
}

fn push_pins(
    out: &mut Vec<PinAssignment>,
    port: &str,
    list: &'static str,
    iostandard: Option<IoStandard>,
    outer_misc: &'static [&'static str],
    inner_misc: &'static [&'static str],
) {
    let pads: Vec<&'static str> = list.split_whitespace().collect();
    let misc: Vec<&'static str> = outer_misc.iter().chain(inner_misc.iter()).copied().collect();
    for (bit, &pin) in pads.iter().enumerate() {
        let port = if pads.len() > 1 {
            format!("{}[{}]", port, bit)
        } else {
            port.to_string()
        };
        out.push(PinAssignment {
            port,
            pin,
            iostandard,
            misc: misc.clone(),
        });
    }
}

#[cfg(test)]
mod platform_tests {
    use super::*;

    static IO: [IoResource; 4] = [
        IoResource {
            name: "clk25",
            number: 0,
            signal: Signal::Pins("G2"),
            iostandard: Some(IoStandard::Lvcmos33),
            misc: &[],
        },
        IoResource {
            name: "user_led",
            number: 0,
            signal: Signal::Pins("B2"),
            iostandard: Some(IoStandard::Lvcmos33),
            misc: &[],
        },
        IoResource {
            name: "user_led",
            number: 1,
            signal: Signal::Pins("C2"),
            iostandard: Some(IoStandard::Lvcmos33),
            misc: &[],
        },
        IoResource {
            name: "serial",
            number: 0,
            signal: Signal::Subsignals(&[
                Subsignal {
                    name: "tx",
                    pins: "L4",
                    iostandard: None,
                    misc: &[],
                },
                Subsignal {
                    name: "data",
                    pins: "M1 M2",
                    iostandard: Some(IoStandard::Lvcmos25),
                    misc: &["PULLMODE=UP"],
                },
            ]),
            iostandard: Some(IoStandard::Lvcmos33),
            misc: &["SLEWRATE=FAST"],
        },
    ];

    static REVS: [Revision; 1] = [Revision { name: "1.0", io: &[] }];

    static BOARD: Board = Board {
        name: "test",
        family: PllFamily::Ecp5,
        target: TargetKind::SerialSoc,
        devices: &["DEV-A", "DEV-B"],
        default_device: "DEV-A",
        package: "-PKG",
        revisions: &REVS,
        default_revision: "1.0",
        io: &IO,
        default_clk_name: "clk25",
        default_clk_freq_hz: 25_000_000,
        reset_name: "rst",
        toolchain: "trellis",
        programmer: Programmer::UjProg,
    };

    #[test]
    fn test_device_and_revision_checks() {
        assert_eq!(Platform::new(&BOARD, None, None).unwrap().part(), "DEV-A-PKG");
        assert!(matches!(
            Platform::new(&BOARD, Some("DEV-C"), None),
            Err(ConfigError::UnsupportedDevice { .. })
        ));
        assert!(matches!(
            Platform::new(&BOARD, None, Some("9.9")),
            Err(ConfigError::UnsupportedRevision { .. })
        ));
    }

    #[test]
    fn test_request_once() {
        let mut plat = Platform::new(&BOARD, None, None).unwrap();
        assert_eq!(plat.request("clk25", 0).unwrap().name, "clk25");
        assert_eq!(
            plat.request("clk25", 0).unwrap_err(),
            ConfigError::ResourceTaken {
                name: "clk25".to_string(),
                number: 0
            }
        );
        assert!(matches!(
            plat.request("user_led", 7),
            Err(ConfigError::UnknownResource { .. })
        ));
    }

    #[test]
    fn test_assignments() {
        let mut plat = Platform::new(&BOARD, None, None).unwrap();
        plat.request("user_led", 1).unwrap();
        plat.request("serial", 0).unwrap();
        let pins = plat.assignments();

        assert_eq!(pins[0].port, "user_led1");
        assert_eq!(pins[1].port, "serial_tx");
        assert_eq!(pins[1].iostandard, Some(IoStandard::Lvcmos33));
        assert_eq!(pins[2].port, "serial_data[0]");
        assert_eq!(pins[3].pin, "M2");
        assert_eq!(pins[3].iostandard, Some(IoStandard::Lvcmos25));
        assert_eq!(pins[3].misc, ["SLEWRATE=FAST", "PULLMODE=UP"]);
    }
}
