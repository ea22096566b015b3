mod domain_events;
mod int_domain_event;
mod int_event_type;

pub use domain_events::DomainEvents;
pub use int_domain_event::IntDomainEvent;
pub use int_event_type::IntEventType;
