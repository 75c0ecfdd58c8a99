/// One side of a byte stream with a valid/ready handshake.
///
/// The producer drives `valid` and `data`, the consumer drives `ready`.
/// A byte moves only on a cycle where both are asserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub valid: bool,
    pub ready: bool,
    pub data: u8,
}

impl Endpoint {
    pub const fn idle() -> Self {
        Self {
            valid: false,
            ready: false,
            data: 0,
        }
    }

    /// True on a transfer cycle
    pub fn fire(&self) -> bool {
        self.valid && self.ready
    }

    /// Byte transferred this cycle, if any
    pub fn transfer(&self) -> Option<u8> {
        if self.fire() {
            Some(self.data)
        } else {
            None
        }
    }
}
