use enumset::enum_set;
use enumset::EnumSet;

use super::IntDomainEvent;
use super::IntEventType;

/// The changes a subscriber wants to be notified of.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    int_events: EnumSet<IntDomainEvent>,
}

impl DomainEvents {
    /// Lower and upper bound changes, instantiations move a bound too.
    pub const BOUNDS: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        IntDomainEvent::LowerBound | IntDomainEvent::UpperBound
    ));
    /// Every change of the domain.
    pub const ANY_INT: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        IntDomainEvent::Assign
            | IntDomainEvent::LowerBound
            | IntDomainEvent::UpperBound
            | IntDomainEvent::Removal
    ));
    pub const LOWER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::UpperBound));
    /// Only the collapse of the domain to a single value.
    pub const ASSIGN: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::Assign));

    pub const fn create_with_int_events(int_events: EnumSet<IntDomainEvent>) -> DomainEvents {
        DomainEvents { int_events }
    }

    pub fn get_int_events(&self) -> EnumSet<IntDomainEvent> {
        self.int_events
    }

    /// Whether a subscriber with these conditions is notified of `event`.
    pub fn is_triggered_by(&self, event: IntEventType) -> bool {
        !self.int_events.is_disjoint(event.mask())
    }
}
