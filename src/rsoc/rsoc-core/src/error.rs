use alloc::string::String;
use thiserror::Error;

/// Composition-time failures. Any of these aborts a build before output is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown board `{0}`")]
    UnknownBoard(String),
    #[error("device `{device}` is not available on board `{board}`")]
    UnsupportedDevice { board: String, device: String },
    #[error("revision `{revision}` is not available on board `{board}`")]
    UnsupportedRevision { board: String, revision: String },
    #[error("no I/O resource `{name}:{number}` on this platform")]
    UnknownResource { name: String, number: u8 },
    #[error("I/O resource `{name}:{number}` was already requested")]
    ResourceTaken { name: String, number: u8 },
    #[error("CSR region `{0}` is already registered")]
    DuplicateCsr(String),
    #[error("no free CSR location left for `{0}`")]
    CsrSpaceExhausted(String),
    #[error("interrupt `{0}` is already registered")]
    DuplicateInterrupt(String),
    #[error("no free interrupt line left for `{0}`")]
    InterruptSpaceExhausted(String),
    #[error("invalid input clock of {0} Hz")]
    InvalidClock(u64),
    #[error("clock domain `{domain}` cannot be generated at {freq_hz} Hz")]
    ClockUnreachable { domain: String, freq_hz: u64 },
    #[error("unsupported CSR data width {0}")]
    InvalidCsrWidth(u32),
}
