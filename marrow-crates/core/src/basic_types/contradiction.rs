use thiserror::Error;

use crate::basic_types::Cause;
use crate::engine::variables::VarId;

/// The result of a propagator invocation or of any other operation that may fail the current
/// world.
pub type PropagationStatus = Result<(), Contradiction>;

/// Signals that the current world has no solution.
///
/// A contradiction is raised before the offending mutation touches the domain, so the domain is
/// left exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("contradiction: {reason}")]
pub struct Contradiction {
    cause: Option<Cause>,
    variable: Option<VarId>,
    reason: ContradictionReason,
}

impl Contradiction {
    pub(crate) fn on_variable(
        variable: VarId,
        cause: Option<Cause>,
        reason: ContradictionReason,
    ) -> Contradiction {
        Contradiction {
            cause,
            variable: Some(variable),
            reason,
        }
    }

    /// A contradiction detected by a propagator without any failing domain operation, e.g. a
    /// violated capacity.
    pub fn from_propagator(cause: Option<Cause>, message: impl Into<String>) -> Contradiction {
        Contradiction {
            cause,
            variable: None,
            reason: ContradictionReason::Propagator(message.into()),
        }
    }

    pub fn cause(&self) -> Option<Cause> {
        self.cause
    }

    /// The variable whose domain would have been emptied, if any.
    pub fn variable(&self) -> Option<VarId> {
        self.variable
    }

    pub fn reason(&self) -> &ContradictionReason {
        &self.reason
    }
}

/// Why a domain operation failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContradictionReason {
    #[error("remove last value")]
    RemoveLastValue,
    #[error("new lower bound is greater than upper bound")]
    LowerBoundAboveUpperBound,
    #[error("new upper bound is lesser than lower bound")]
    UpperBoundBelowLowerBound,
    #[error("new bounds are incorrect")]
    IncorrectBounds,
    #[error("the domain does not contain that value")]
    ValueNotInDomain,
    #[error("already instantiated to another value")]
    InstantiatedToAnotherValue,
    #[error("domain wiped out")]
    WipeOut,
    #[error("{0}")]
    Propagator(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn display_names_the_reason() {
        let contradiction = Contradiction::on_variable(
            VarId::create_from_index(0),
            None,
            ContradictionReason::RemoveLastValue,
        );

        assert_eq!("contradiction: remove last value", contradiction.to_string());
    }

    #[test]
    fn propagator_contradictions_carry_their_message() {
        let contradiction = Contradiction::from_propagator(None, "capacity exceeded");

        assert_eq!(None, contradiction.variable());
        assert_eq!(
            &ContradictionReason::Propagator("capacity exceeded".to_owned()),
            contradiction.reason()
        );
    }
}
