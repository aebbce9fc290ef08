use std::fmt;

/// Identifier of one authentication attempt.
///
/// Ids are issued in strictly increasing order for the lifetime of the process, so a
/// result can be matched against the current flight with a plain equality check.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FlightId(u64);

impl FlightId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic flight generation.
///
/// At most one flight is current. `issue()` replaces it, `retire()` clears it; a retired
/// or replaced id never becomes current again.
#[derive(Debug, Default)]
pub struct FlightCounter {
    issued: u64,
    current: Option<FlightId>,
}

impl FlightCounter {
    pub const fn new() -> Self {
        Self {
            issued: 0,
            current: None,
        }
    }

    /// Allocate a fresh flight id and make it current. The first id is 1.
    pub fn issue(&mut self) -> FlightId {
        self.issued += 1;
        let id = FlightId(self.issued);
        self.current = Some(id);
        id
    }

    /// Invalidate the current flight, if any. Returns the retired id.
    pub fn retire(&mut self) -> Option<FlightId> {
        self.current.take()
    }

    pub fn current(&self) -> Option<FlightId> {
        self.current
    }

    /// Number of flights issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn is_current(&self, flight: FlightId) -> bool {
        self.current == Some(flight)
    }
}
