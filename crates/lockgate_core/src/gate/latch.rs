use std::sync::atomic::{AtomicBool, Ordering};

/// Process-shared "content may be shown" flag.
///
/// Intended use:
/// - the gate calls `conceal()` on the same path that raises the curtain
/// - the gate calls `reveal()` only when it transitions to `Unlocked`
/// - snapshot producers and other content exporters check `is_revealed()`
///
/// Starts revealed, matching the gate's initial `Unlocked` state.
#[derive(Debug)]
pub struct RevealLatch {
    revealed: AtomicBool,
}

impl RevealLatch {
    pub const fn new() -> Self {
        Self {
            revealed: AtomicBool::new(true),
        }
    }

    pub fn reveal(&self) {
        self.revealed.store(true, Ordering::Release);
    }

    pub fn conceal(&self) {
        self.revealed.store(false, Ordering::Release);
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed.load(Ordering::Acquire)
    }
}

impl Default for RevealLatch {
    fn default() -> Self {
        Self::new()
    }
}
