//! Backtrackable memory.
//!
//! Every domain is built from cells allocated in the [`ReversibleStore`]; writes are logged on a
//! single trail so that popping a world costs as much as the number of writes it undoes.
mod handles;
mod store;

pub use handles::ReversibleBitSet;
pub use handles::ReversibleInt;
pub use store::ReversibleStore;
