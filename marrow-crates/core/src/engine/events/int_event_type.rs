use std::fmt::Display;

use enumset::enum_set;
use enumset::EnumSet;

use super::IntDomainEvent;

/// The classification of a single domain mutation.
///
/// A stronger event implies the weaker ones: raising the lower bound removes values, and an
/// instantiation moves the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntEventType {
    /// Values strictly between the bounds were removed.
    Remove,
    /// The lower bound increased.
    IncLow,
    /// The upper bound decreased.
    DecUpp,
    /// Both bounds moved.
    Bound,
    /// The domain is now a singleton.
    Instantiate,
}

impl IntEventType {
    /// The atomic changes implied by this event.
    pub fn mask(self) -> EnumSet<IntDomainEvent> {
        match self {
            IntEventType::Remove => enum_set!(IntDomainEvent::Removal),
            IntEventType::IncLow => enum_set!(IntDomainEvent::Removal | IntDomainEvent::LowerBound),
            IntEventType::DecUpp => enum_set!(IntDomainEvent::Removal | IntDomainEvent::UpperBound),
            IntEventType::Bound => enum_set!(
                IntDomainEvent::Removal | IntDomainEvent::LowerBound | IntDomainEvent::UpperBound
            ),
            IntEventType::Instantiate => EnumSet::all(),
        }
    }

    /// Classifies a mutation from the edges it moved and the size it left.
    pub(crate) fn classify(
        lower_bound_moved: bool,
        upper_bound_moved: bool,
        instantiated: bool,
    ) -> IntEventType {
        match (instantiated, lower_bound_moved, upper_bound_moved) {
            (true, _, _) => IntEventType::Instantiate,
            (false, true, true) => IntEventType::Bound,
            (false, true, false) => IntEventType::IncLow,
            (false, false, true) => IntEventType::DecUpp,
            (false, false, false) => IntEventType::Remove,
        }
    }

    /// Whether this event is strictly stronger than the `requested` one, e.g. a removal which hit
    /// the lower bound.
    pub fn is_promotion_of(self, requested: IntEventType) -> bool {
        self != requested && self.mask().is_superset(requested.mask())
    }

    /// The event as seen through a decreasing transformation, which exchanges the bounds.
    pub fn mirrored(self) -> IntEventType {
        match self {
            IntEventType::IncLow => IntEventType::DecUpp,
            IntEventType::DecUpp => IntEventType::IncLow,
            other => other,
        }
    }
}

impl Display for IntEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntEventType::Remove => write!(f, "REMOVE"),
            IntEventType::IncLow => write!(f, "INCLOW"),
            IntEventType::DecUpp => write!(f, "DECUPP"),
            IntEventType::Bound => write!(f, "BOUND"),
            IntEventType::Instantiate => write!(f, "INSTANTIATE"),
        }
    }
}
