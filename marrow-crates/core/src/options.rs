//! Configuration of a [`Model`](crate::engine::model::Model).

/// Options which decide how a [`Model`](crate::engine::model::Model) encodes its variables and
/// whether it reports statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOptions {
    /// Domains given by their bounds with at least this many values are stored as an interval,
    /// smaller ones as a bit-set.
    pub enumerated_threshold: usize,
    /// Domains given by their values use the sparse encoding when their span exceeds
    /// `sparse_gap` and the span divided by the number of values exceeds `sparse_density`.
    pub sparse_gap: usize,
    /// See [`ModelOptions::sparse_gap`].
    pub sparse_density: usize,
    /// Whether [`Model::log_statistics`](crate::engine::model::Model::log_statistics) writes
    /// anything.
    pub log_statistics: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        ModelOptions {
            enumerated_threshold: 65_536,
            sparse_gap: 30,
            sparse_density: 5,
            log_statistics: false,
        }
    }
}

impl ModelOptions {
    /// The encoding chosen for a domain with `count` values spread over `span` integers.
    pub fn representation_for(&self, span: usize, count: usize) -> DomainRepresentation {
        if span > self.sparse_gap && span / count > self.sparse_density {
            DomainRepresentation::SparseBitset
        } else {
            DomainRepresentation::Bitset
        }
    }

    /// The encoding chosen for the domain `[lower_bound, upper_bound]` with `span` values.
    pub fn representation_for_interval(&self, span: usize) -> DomainRepresentation {
        if span >= self.enumerated_threshold {
            DomainRepresentation::Interval
        } else {
            DomainRepresentation::Bitset
        }
    }
}

/// The encodings of an integer domain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DomainRepresentation {
    /// Only the bounds; values between them cannot be removed.
    Interval,
    /// One bit per value between the initial bounds.
    #[default]
    Bitset,
    /// One bit per initial value, for few values spread over a wide range.
    SparseBitset,
}
