use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::debug;

use crate::error::ConfigError;

/// A synchronous clock domain: the clock/reset handle every component is built against.
///
/// Components never reach for global time; they receive the domain they are
/// clocked by at construction and on every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockDomain {
    name: String,
    freq_hz: u64,
    reset_less: bool,
    cycle: u64, // Edges seen since power-on
    reset: bool,
}

impl ClockDomain {
    pub fn new(name: &str, freq_hz: u64) -> Self {
        Self {
            name: name.to_string(),
            freq_hz,
            reset_less: false,
            cycle: 0,
            reset: false,
        }
    }

    /// Domain without a reset net; reset requests are ignored
    pub fn reset_less(mut self) -> Self {
        self.reset_less = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn freq_hz(&self) -> u64 {
        self.freq_hz
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_reset_less(&self) -> bool {
        self.reset_less
    }

    pub fn in_reset(&self) -> bool {
        self.reset && !self.reset_less
    }

    pub fn assert_reset(&mut self) {
        self.reset = true;
    }

    pub fn release_reset(&mut self) {
        self.reset = false;
    }

    /// One rising edge
    pub fn advance(&mut self) {
        self.cycle = self.cycle.wrapping_add(1);
    }
}

/// PLL primitive families with their legal operating ranges
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PllFamily {
    Series7, // Xilinx 7-series PLLE2
    Ecp5,    // Lattice ECP5 EHXPLLL
}

impl PllFamily {
    fn vco_range(self) -> (u64, u64) {
        match self {
            PllFamily::Series7 => (800_000_000, 1_600_000_000),
            PllFamily::Ecp5 => (400_000_000, 800_000_000),
        }
    }

    fn clkin_range(self) -> (u64, u64) {
        match self {
            PllFamily::Series7 => (19_000_000, 800_000_000),
            PllFamily::Ecp5 => (8_000_000, 400_000_000),
        }
    }
}

const DIVCLK_MAX: u64 = 56;
const MULT_MIN: u64 = 2;
const MULT_MAX: u64 = 64;
const OUTPUT_DIV_MAX: u64 = 128;

/// Accepted output error, in percent of the requested frequency
const FREQ_TOLERANCE_PCT: u64 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PllOutput {
    pub domain: String,
    pub freq_hz: u64,
    pub divider: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PllConfig {
    pub clkin_hz: u64,
    pub divclk: u32,
    pub mult: u32,
    pub vco_hz: u64,
    pub outputs: Vec<PllOutput>,
}

/// Requested output of the clock/reset generator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainRequest {
    pub name: &'static str,
    pub freq_hz: u64,
    pub reset_less: bool,
}

fn within_tolerance(actual: u64, wanted: u64) -> bool {
    let diff = if actual > wanted {
        actual - wanted
    } else {
        wanted - actual
    };
    diff * 100 <= wanted * FREQ_TOLERANCE_PCT
}

/// Closest output divider for `freq_hz` at `vco_hz`, if one lands within tolerance
fn best_divider(vco_hz: u64, freq_hz: u64) -> Option<u64> {
    (1..=OUTPUT_DIV_MAX)
        .filter(|d| within_tolerance(vco_hz / d, freq_hz))
        .min_by_key(|d| {
            let out = vco_hz / d;
            if out > freq_hz {
                out - freq_hz
            } else {
                freq_hz - out
            }
        })
}

/// Searches divider/multiplier settings that produce every requested output.
///
/// The first VCO setting (lowest input divider, then lowest multiplier)
/// satisfying all outputs wins, so the result is stable for given inputs.
pub fn plan_pll(
    family: PllFamily,
    clkin_hz: u64,
    requests: &[DomainRequest],
) -> Result<PllConfig, ConfigError> {
    let (clkin_min, clkin_max) = family.clkin_range();
    if clkin_hz < clkin_min || clkin_hz > clkin_max {
        return Err(ConfigError::InvalidClock(clkin_hz));
    }
    // No output divider can reach zero or anything above the VCO
    let (vco_min, vco_max) = family.vco_range();
    if let Some(req) = requests
        .iter()
        .find(|r| r.freq_hz == 0 || r.freq_hz > vco_max)
    {
        return Err(ConfigError::ClockUnreachable {
            domain: req.name.to_string(),
            freq_hz: req.freq_hz,
        });
    }

    let mut reachable = [false; 8];
    for divclk in 1..=DIVCLK_MAX {
        for mult in MULT_MIN..=MULT_MAX {
            let vco_hz = clkin_hz * mult / divclk;
            if vco_hz < vco_min || vco_hz > vco_max {
                continue;
            }

            let dividers: Vec<Option<u64>> = requests
                .iter()
                .map(|r| best_divider(vco_hz, r.freq_hz))
                .collect();
            for (idx, d) in dividers.iter().enumerate() {
                if d.is_some() && idx < reachable.len() {
                    reachable[idx] = true;
                }
            }
            if dividers.iter().all(Option::is_some) {
                let outputs = requests
                    .iter()
                    .zip(dividers)
                    .map(|(r, d)| {
                        let d = d.unwrap_or(1);
                        PllOutput {
                            domain: r.name.to_string(),
                            freq_hz: vco_hz / d,
                            divider: d as u32,
                        }
                    })
                    .collect();
                debug!(
                    "PLL: clkin {} Hz, divclk {}, mult {}, vco {} Hz",
                    clkin_hz, divclk, mult, vco_hz
                );
                return Ok(PllConfig {
                    clkin_hz,
                    divclk: divclk as u32,
                    mult: mult as u32,
                    vco_hz,
                    outputs,
                });
            }
        }
    }

    // Blame an output no setting could produce, else the first one
    let culprit = requests
        .iter()
        .enumerate()
        .find(|(idx, _)| *idx < reachable.len() && !reachable[*idx])
        .map(|(_, r)| r)
        .or_else(|| requests.first());
    Err(match culprit {
        Some(r) => ConfigError::ClockUnreachable {
            domain: r.name.to_string(),
            freq_hz: r.freq_hz,
        },
        None => ConfigError::InvalidClock(clkin_hz),
    })
}

/// Clock/reset generator: one PLL feeding the SoC's clock domains
pub struct Crg {
    pll: PllConfig,
    domains: Vec<ClockDomain>,
}

impl Crg {
    pub fn new(
        family: PllFamily,
        clkin_hz: u64,
        requests: &[DomainRequest],
    ) -> Result<Self, ConfigError> {
        let pll = plan_pll(family, clkin_hz, requests)?;
        let domains = requests
            .iter()
            .zip(pll.outputs.iter())
            .map(|(r, out)| {
                let cd = ClockDomain::new(r.name, out.freq_hz);
                if r.reset_less {
                    cd.reset_less()
                } else {
                    cd
                }
            })
            .collect();
        Ok(Self { pll, domains })
    }

    pub fn pll(&self) -> &PllConfig {
        &self.pll
    }

    pub fn domains(&self) -> &[ClockDomain] {
        &self.domains
    }

    pub fn domain(&self, name: &str) -> Option<&ClockDomain> {
        self.domains.iter().find(|cd| cd.name() == name)
    }

    pub fn domain_mut(&mut self, name: &str) -> Option<&mut ClockDomain> {
        self.domains.iter_mut().find(|cd| cd.name() == name)
    }

    /// Board reset input, fanned out to every domain that has a reset net
    pub fn set_reset(&mut self, asserted: bool) {
        for cd in self.domains.iter_mut() {
            if asserted {
                cd.assert_reset();
            } else {
                cd.release_reset();
            }
        }
    }
}
