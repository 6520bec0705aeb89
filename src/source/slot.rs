//! Tri-state cache slots for acquisition-populated fields.

use std::path::PathBuf;

/// Cache state for one field the backend fills as a side effect.
///
/// `Pending` and `Missed` both mean "no usable value yet", but differ on
/// what happens next: a `Pending` field triggers acquisition, while `Missed`
/// records that a successful acquisition produced nothing for this field,
/// so fallback inference fills it without touching the backend again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Slot<T> {
    Pending,
    Ready(T),
    Missed,
}

impl<T> Slot<T> {
    pub(super) fn is_ready(&self) -> bool {
        matches!(self, Slot::Ready(_))
    }

    pub(super) fn value(&self) -> Option<&T> {
        match self {
            Slot::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub(super) fn from_detected(value: Option<T>) -> Self {
        match value {
            Some(v) => Slot::Ready(v),
            None => Slot::Missed,
        }
    }
}

/// All acquisition-populated fields, guarded by one mutex per source.
#[derive(Debug)]
pub(super) struct ResolveState {
    pub name: Slot<String>,
    pub mimetype: Slot<String>,
    pub path: Slot<PathBuf>,
}

impl ResolveState {
    pub(super) fn new() -> Self {
        Self {
            name: Slot::Pending,
            mimetype: Slot::Pending,
            path: Slot::Pending,
        }
    }

    /// Failed acquisitions leave no trace; the next access retries.
    pub(super) fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_exposes_value() {
        let slot = Slot::Ready("x".to_string());
        assert!(slot.is_ready());
        assert_eq!(slot.value().map(String::as_str), Some("x"));
    }

    #[test]
    fn pending_and_missed_have_no_value() {
        let pending: Slot<String> = Slot::Pending;
        let missed: Slot<String> = Slot::Missed;
        assert!(!pending.is_ready());
        assert!(!missed.is_ready());
        assert!(pending.value().is_none());
        assert!(missed.value().is_none());
    }

    #[test]
    fn from_detected_maps_none_to_missed() {
        assert_eq!(Slot::from_detected(Some(1)), Slot::Ready(1));
        assert_eq!(Slot::<i32>::from_detected(None), Slot::Missed);
    }

    #[test]
    fn reset_returns_all_slots_to_pending() {
        let mut state = ResolveState::new();
        state.name = Slot::Ready("a.gif".to_string());
        state.path = Slot::Missed;
        state.reset();
        assert_eq!(state.name, Slot::Pending);
        assert_eq!(state.mimetype, Slot::Pending);
        assert_eq!(state.path, Slot::Pending);
    }
}
