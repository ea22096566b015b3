//! Containers shared by the store, the variables and the engine.
mod keyed_vec;
mod range_set;

use fnv::FnvBuildHasher;
pub use keyed_vec::*;
pub use range_set::*;

/// [`std::collections::HashMap`] with a deterministic hasher.
#[allow(clippy::disallowed_types, reason = "this is how we define our HashMap")]
pub type HashMap<K, V, Hasher = FnvBuildHasher> = std::collections::HashMap<K, V, Hasher>;
/// [`std::collections::HashSet`] with a deterministic hasher.
#[allow(clippy::disallowed_types, reason = "this is how we define our HashSet")]
pub type HashSet<K, Hasher = FnvBuildHasher> = std::collections::HashSet<K, Hasher>;
