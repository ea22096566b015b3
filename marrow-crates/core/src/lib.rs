//! Finite-domain integer variables for constraint programming.
//!
//! The crate provides the runtime a propagation based solver is built on: a [`Model`] owns a
//! reversible store in which integer domains live in one of three encodings, it dispatches the
//! events of every domain change to monitors, propagators and views, and it undoes all of it
//! when a world is popped. Contradictions are returned as [`Contradiction`] errors and end the
//! current fix-point.
//!
//! ```rust
//! use marrow_core::containers::RangeSet;
//! use marrow_core::IntegerVariable;
//! use marrow_core::Model;
//!
//! let mut model = Model::default();
//! let x = model.new_int_var_from_values(&[1, 3, 5, 7, 9], "x").unwrap();
//!
//! let mut context = model.context();
//! let _ = context.remove_values(&x, &RangeSet::interval(2, 5)).unwrap();
//! assert_eq!("x = {1,7,9}", model.variables().display(x).to_string());
//! ```
pub mod basic_types;
pub mod containers;
pub mod engine;
pub(crate) mod marrow_asserts;
pub(crate) mod math;
pub mod options;
pub mod statistics;

pub use convert_case;

pub use crate::basic_types::Cause;
pub use crate::basic_types::Contradiction;
pub use crate::basic_types::ContradictionReason;
pub use crate::basic_types::ModelError;
pub use crate::basic_types::PropagationStatus;
pub use crate::engine::model::Model;
pub use crate::engine::variables::IntegerVariable;
pub use crate::engine::variables::VarId;
pub use crate::engine::variables::ViewId;
pub use crate::options::DomainRepresentation;
pub use crate::options::ModelOptions;
