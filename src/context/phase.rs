//! Context lifecycle and the validity gate.
//!
//! The lifecycle is an explicit tagged state rather than a boolean: the
//! "optimistically valid while initializing" window is load-bearing for
//! bootstrap and easy to regress with a plain flag.

use std::fmt;

/// Lifecycle phase of a data context.
///
/// `Uninitialized` -> `Initializing` when initialization begins;
/// `Initializing` -> `Ready` only once the store and the initial
/// institution selection are both present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecyclePhase::Uninitialized => "uninitialized",
            LifecyclePhase::Initializing => "initializing",
            LifecyclePhase::Ready => "ready",
        };
        f.write_str(label)
    }
}

/// Outcome of the validity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Optimistic window: bootstrap code may populate fields before the
    /// full invariant holds.
    Initializing,
    /// Store present, institution selected and resolvable in the store.
    Ready,
    /// Not usable; the reason names the first failed requirement.
    Invalid(&'static str),
}

impl Validity {
    pub fn usable(&self) -> bool {
        !matches!(self, Validity::Invalid(_))
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Validity::Initializing => "initialization in progress",
            Validity::Ready => "ready",
            Validity::Invalid(reason) => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_uninitialized() {
        assert_eq!(LifecyclePhase::default(), LifecyclePhase::Uninitialized);
    }

    #[test]
    fn only_invalid_is_unusable() {
        assert!(Validity::Initializing.usable());
        assert!(Validity::Ready.usable());
        assert!(!Validity::Invalid("store not set").usable());
        assert_eq!(Validity::Invalid("store not set").reason(), "store not set");
    }
}
