use super::FlightId;

/// Lock state of the gate.
///
/// - `Unlocked`: content visible, curtain down, no flight outstanding
/// - `Locked`: curtain up, no flight outstanding
/// - `Authenticating(id)`: curtain up, exactly one flight outstanding
/// - `AuthFailed`: curtain up, last attempt failed, unlock affordance enabled
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum GateState {
    #[default]
    Unlocked,
    Locked,
    Authenticating(FlightId),
    AuthFailed,
}

/// Data-free mirror of [`GateState`], used for tables and compact ids.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StateKind {
    Unlocked,
    Locked,
    Authenticating,
    AuthFailed,
}

impl GateState {
    pub const fn kind(self) -> StateKind {
        match self {
            GateState::Unlocked => StateKind::Unlocked,
            GateState::Locked => StateKind::Locked,
            GateState::Authenticating(_) => StateKind::Authenticating,
            GateState::AuthFailed => StateKind::AuthFailed,
        }
    }

    /// Internal, compact id used in error payloads.
    pub const fn id(self) -> u8 {
        self.kind().id()
    }

    pub const fn label(self) -> &'static str {
        self.kind().label()
    }

    /// The curtain must be up in every state except `Unlocked`.
    pub const fn curtain_required(self) -> bool {
        !matches!(self, GateState::Unlocked)
    }

    /// The outstanding flight, if any.
    pub const fn flight(self) -> Option<FlightId> {
        match self {
            GateState::Authenticating(id) => Some(id),
            _ => None,
        }
    }
}

impl StateKind {
    pub const fn id(self) -> u8 {
        match self {
            StateKind::Unlocked => 0,
            StateKind::Locked => 1,
            StateKind::Authenticating => 2,
            StateKind::AuthFailed => 3,
        }
    }

    /// Stable, human-readable label for logs and scripts.
    pub const fn label(self) -> &'static str {
        match self {
            StateKind::Unlocked => "Unlocked",
            StateKind::Locked => "Locked",
            StateKind::Authenticating => "Authenticating",
            StateKind::AuthFailed => "AuthFailed",
        }
    }

    /// Inverse of [`StateKind::label`], case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        ALL_STATE_KINDS
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(label))
    }
}

/// Canonical list of all state kinds.
pub const ALL_STATE_KINDS: [StateKind; 4] = [
    StateKind::Unlocked,
    StateKind::Locked,
    StateKind::Authenticating,
    StateKind::AuthFailed,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unlocked_reveals_content() {
        assert!(!GateState::Unlocked.curtain_required());
        assert!(GateState::Locked.curtain_required());
        assert!(GateState::Authenticating(FlightId::new(1)).curtain_required());
        assert!(GateState::AuthFailed.curtain_required());
    }

    #[test]
    fn labels_round_trip() {
        for kind in ALL_STATE_KINDS {
            assert_eq!(StateKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(StateKind::from_label("authfailed"), Some(StateKind::AuthFailed));
        assert_eq!(StateKind::from_label("open"), None);
    }
}
