//! Board tables for the SoC generator.
//!
//! Each board is a static [`Board`] value; adding a board means adding a
//! table here, not a new type.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod boards;

use alloc::string::ToString;
use rsoc_core::platform::Board;
use rsoc_core::ConfigError;

pub use boards::{nereid, ulx3s};

/// Every board the generator knows about
pub static BOARDS: [&Board; 2] = [&ulx3s::ULX3S, &nereid::NEREID];

pub fn find(name: &str) -> Result<&'static Board, ConfigError> {
    BOARDS
        .iter()
        .copied()
        .find(|b| b.name == name)
        .ok_or_else(|| ConfigError::UnknownBoard(name.to_string()))
}

#[cfg(test)]
mod boards_tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find("ulx3s").unwrap().name, "ulx3s");
        assert_eq!(find("nereid").unwrap().default_clk_name, "clk100");
        assert_eq!(
            find("arty").unwrap_err(),
            ConfigError::UnknownBoard("arty".to_string())
        );
    }

    #[test]
    fn test_resource_keys_unique() {
        for board in BOARDS.iter() {
            for rev in board.revisions.iter() {
                let all: alloc::vec::Vec<_> = board.io.iter().chain(rev.io.iter()).collect();
                for (i, a) in all.iter().enumerate() {
                    for b in all[i + 1..].iter() {
                        assert!(
                            !(a.name == b.name && a.number == b.number),
                            "{} {}:{} defined twice",
                            board.name,
                            a.name,
                            a.number
                        );
                    }
                }
            }
        }
    }
}
