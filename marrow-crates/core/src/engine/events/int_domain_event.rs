use std::fmt::Display;

use enumset::EnumSetType;

/// The atomic changes a domain can undergo.
///
/// An [`IntEventType`](super::IntEventType) implies a set of these, and subscribers state the
/// atomic changes they want to hear about.
#[derive(Debug, EnumSetType, Hash)]
pub enum IntDomainEvent {
    /// The domain collapsed to a single value.
    Assign,
    /// The lower bound increased.
    LowerBound,
    /// The upper bound decreased.
    UpperBound,
    /// At least one value was removed.
    Removal,
}

impl Display for IntDomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntDomainEvent::Assign => write!(f, "[Event:Assign]"),
            IntDomainEvent::LowerBound => write!(f, "[Event:LB]"),
            IntDomainEvent::UpperBound => write!(f, "[Event:UB]"),
            IntDomainEvent::Removal => write!(f, "[Event:Remove]"),
        }
    }
}
