//! Integer variables, the views over them and the ways to read their domains.
//!
//! A variable is identified by a [`VarId`], a view by a [`ViewId`]; both implement
//! [`IntegerVariable`], the interface propagators program against. The domains themselves live
//! in the [`VariableStore`].
mod affine_view;
mod domains;
mod ids;
mod int_variable;
mod integer_variable;
mod iterators;
mod variable_store;

pub(crate) use affine_view::AffineView;
pub(crate) use domains::BitsetDomain;
pub(crate) use domains::Domain;
pub(crate) use domains::IntegerDomain;
pub(crate) use domains::IntervalDomain;
pub(crate) use domains::SparseBitsetDomain;
pub use ids::VarId;
pub use ids::VariableRef;
pub use ids::ViewId;
pub(crate) use int_variable::IntVariable;
pub(crate) use int_variable::Modification;
pub(crate) use int_variable::MutationResult;
pub use integer_variable::IntegerVariable;
pub use iterators::RangeIterator;
pub use iterators::ValueIterator;
pub use variable_store::DomainDisplay;
pub(crate) use variable_store::StashedDeltas;
pub use variable_store::VariableStore;
