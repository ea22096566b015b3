use std::fmt::Display;

use crate::engine::propagation::PropagatorId;

/// The agent responsible for a domain mutation.
///
/// Mutations take an `Option<Cause>`; `None` marks a mutation without a responsible propagator,
/// such as a search decision. Notifications are never sent back to the propagator named by the
/// cause of the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cause {
    propagator: PropagatorId,
    react_on_promotion: bool,
}

impl Cause {
    pub fn new(propagator: PropagatorId, react_on_promotion: bool) -> Cause {
        Cause {
            propagator,
            react_on_promotion,
        }
    }

    pub fn propagator(&self) -> PropagatorId {
        self.propagator
    }

    /// Whether the propagator wants to hear about its own mutations once they turn into a
    /// stronger event than the one it requested.
    pub fn reacts_on_promotion(&self) -> bool {
        self.react_on_promotion
    }

    /// The cause under which an event is dispatched after it was promoted, e.g. a removal which
    /// turned out to move the lower bound.
    pub(crate) fn promote(cause: Option<Cause>) -> Option<Cause> {
        match cause {
            Some(cause) if cause.react_on_promotion => None,
            other => other,
        }
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.propagator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn promotion_clears_the_cause_of_a_reacting_propagator() {
        let cause = Cause::new(PropagatorId::create_from_index(3), true);
        assert_eq!(None, Cause::promote(Some(cause)));
    }

    #[test]
    fn promotion_keeps_the_cause_of_other_propagators() {
        let cause = Cause::new(PropagatorId::create_from_index(3), false);
        assert_eq!(Some(cause), Cause::promote(Some(cause)));
        assert_eq!(None, Cause::promote(None));
    }
}
