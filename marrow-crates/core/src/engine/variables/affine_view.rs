use std::cmp::Ordering;

use super::IntegerVariable;
use super::VarId;
use super::VariableStore;
use crate::basic_types::Contradiction;
use crate::basic_types::ContradictionReason;
use crate::basic_types::PropagationStatus;
use crate::containers::RangeSet;
use crate::engine::events::IntEventType;
use crate::engine::propagation::PropagationContext;
use crate::math::NumExt;

/// Models the relation `y = ax + b`, by expressing the domain of `y` as a transformation of the
/// domain of the variable `x`.
///
/// Reads map the domain of `x`, writes are inverted onto `x`. Since only multiples of the scale
/// are in the view, inverting a bound rounds towards the inside of the domain.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub(crate) struct AffineView {
    source: VarId,
    scale: i32,
    offset: i32,
}

impl AffineView {
    pub(crate) fn new(source: VarId, scale: i32, offset: i32) -> Self {
        assert_ne!(scale, 0, "Multiplication by zero is not invertable");
        AffineView {
            source,
            scale,
            offset,
        }
    }

    pub(crate) fn source(&self) -> VarId {
        self.source
    }

    /// Apply the inverse transformation of this view on a value, to go from the value in the
    /// domain of `self` to a value in the domain of the source.
    ///
    /// The result saturates just outside the universe, where no domain has values, so a bound
    /// beyond the universe still lies beyond every bound of the source.
    fn invert(&self, value: i32, rounding: Rounding) -> i32 {
        let inverted_translation = i64::from(value) - i64::from(self.offset);
        let scale = i64::from(self.scale);
        let inverted = match rounding {
            Rounding::Up => inverted_translation.ceil_div(scale),
            Rounding::Down => inverted_translation.floor_div(scale),
        };
        inverted.clamp(
            i64::from(RangeSet::UNIVERSE_MIN) - 1,
            i64::from(RangeSet::UNIVERSE_MAX) + 1,
        ) as i32
    }

    /// The source value mapping onto `value`, if there is one.
    fn invert_exactly(&self, value: i32) -> Option<i32> {
        if !(RangeSet::UNIVERSE_MIN..=RangeSet::UNIVERSE_MAX).contains(&value) {
            return None;
        }
        let inverted_translation = i64::from(value) - i64::from(self.offset);
        let scale = i64::from(self.scale);
        if !inverted_translation.is_divisible_by(scale) {
            return None;
        }
        i32::try_from(inverted_translation / scale).ok()
    }

    fn map(&self, value: i32) -> i32 {
        self.scale * value + self.offset
    }

    /// Maps a sentinel of the source onto the sentinel on the same side of the view.
    fn map_or_sentinel(&self, value: i32) -> i32 {
        match value {
            i32::MAX if self.scale > 0 => i32::MAX,
            i32::MAX => i32::MIN,
            i32::MIN if self.scale > 0 => i32::MIN,
            i32::MIN => i32::MAX,
            value => self.map(value),
        }
    }

    /// The event of the view given the event of its source.
    pub(crate) fn translate(&self, event: IntEventType) -> IntEventType {
        if self.scale < 0 {
            event.mirrored()
        } else {
            event
        }
    }

    /// All source values which map into `values`.
    fn preimage(&self, values: &RangeSet) -> RangeSet {
        let mut preimage = RangeSet::new();
        for (lo, hi) in values.ranges() {
            let (from, to) = if self.scale > 0 {
                (self.invert(lo, Rounding::Up), self.invert(hi, Rounding::Down))
            } else {
                (self.invert(hi, Rounding::Up), self.invert(lo, Rounding::Down))
            };
            if from <= to {
                let _ = preimage.add_between(from, to);
            }
        }
        preimage
    }

    pub(crate) fn lower_bound(&self, variables: &VariableStore) -> i32 {
        if self.scale < 0 {
            self.map(self.source.upper_bound(variables))
        } else {
            self.map(self.source.lower_bound(variables))
        }
    }

    pub(crate) fn upper_bound(&self, variables: &VariableStore) -> i32 {
        if self.scale < 0 {
            self.map(self.source.lower_bound(variables))
        } else {
            self.map(self.source.upper_bound(variables))
        }
    }

    pub(crate) fn size(&self, variables: &VariableStore) -> usize {
        self.source.size(variables)
    }

    pub(crate) fn contains(&self, variables: &VariableStore, value: i32) -> bool {
        self.invert_exactly(value)
            .is_some_and(|inverted| self.source.contains(variables, inverted))
    }

    pub(crate) fn next_value(&self, variables: &VariableStore, value: i32) -> i32 {
        let next = if self.scale > 0 {
            self.source
                .next_value(variables, self.invert(value, Rounding::Down))
        } else {
            self.source
                .previous_value(variables, self.invert(value, Rounding::Up))
        };
        self.map_or_sentinel(next)
    }

    pub(crate) fn previous_value(&self, variables: &VariableStore, value: i32) -> i32 {
        let previous = if self.scale > 0 {
            self.source
                .previous_value(variables, self.invert(value, Rounding::Up))
        } else {
            self.source
                .next_value(variables, self.invert(value, Rounding::Down))
        };
        self.map_or_sentinel(previous)
    }

    pub(crate) fn next_value_out(&self, variables: &VariableStore, value: i32) -> i32 {
        match self.scale {
            1 => self.map(
                self.source
                    .next_value_out(variables, self.invert(value, Rounding::Down)),
            ),
            -1 => self.map(
                self.source
                    .previous_value_out(variables, self.invert(value, Rounding::Down)),
            ),
            // Consecutive values of the view are at least two apart.
            _ if self.contains(variables, value + 1) => value + 2,
            _ => value + 1,
        }
    }

    pub(crate) fn previous_value_out(&self, variables: &VariableStore, value: i32) -> i32 {
        match self.scale {
            1 => self.map(
                self.source
                    .previous_value_out(variables, self.invert(value, Rounding::Down)),
            ),
            -1 => self.map(
                self.source
                    .next_value_out(variables, self.invert(value, Rounding::Down)),
            ),
            _ if self.contains(variables, value - 1) => value - 2,
            _ => value - 1,
        }
    }

    pub(crate) fn has_enumerated_domain(&self, variables: &VariableStore) -> bool {
        self.source.has_enumerated_domain(variables)
    }

    pub(crate) fn remove_value(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        match self.invert_exactly(value) {
            Some(inverted) => self.source.remove_value(context, inverted),
            None => Ok(false),
        }
    }

    pub(crate) fn remove_interval(
        &self,
        context: &mut PropagationContext<'_>,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction> {
        let (from, to) = if self.scale > 0 {
            (self.invert(from, Rounding::Up), self.invert(to, Rounding::Down))
        } else {
            (self.invert(to, Rounding::Up), self.invert(from, Rounding::Down))
        };
        self.source.remove_interval(context, from, to)
    }

    pub(crate) fn update_lower_bound(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        if self.scale < 0 {
            let inverted_bound = self.invert(value, Rounding::Down);
            self.source.update_upper_bound(context, inverted_bound)
        } else {
            let inverted_bound = self.invert(value, Rounding::Up);
            self.source.update_lower_bound(context, inverted_bound)
        }
    }

    pub(crate) fn update_upper_bound(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        if self.scale < 0 {
            let inverted_bound = self.invert(value, Rounding::Up);
            self.source.update_lower_bound(context, inverted_bound)
        } else {
            let inverted_bound = self.invert(value, Rounding::Down);
            self.source.update_upper_bound(context, inverted_bound)
        }
    }

    pub(crate) fn update_bounds(
        &self,
        context: &mut PropagationContext<'_>,
        lower: i32,
        upper: i32,
    ) -> Result<bool, Contradiction> {
        if self.scale < 0 {
            let source_lower = self.invert(upper, Rounding::Up);
            let source_upper = self.invert(lower, Rounding::Down);
            self.source.update_bounds(context, source_lower, source_upper)
        } else {
            let source_lower = self.invert(lower, Rounding::Up);
            let source_upper = self.invert(upper, Rounding::Down);
            self.source.update_bounds(context, source_lower, source_upper)
        }
    }

    pub(crate) fn instantiate_to(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        match self.invert_exactly(value) {
            Some(inverted) => self.source.instantiate_to(context, inverted),
            None => {
                let reason = if self.source.is_instantiated(context.variables()) {
                    ContradictionReason::InstantiatedToAnotherValue
                } else {
                    ContradictionReason::ValueNotInDomain
                };
                Err(context.contradiction_on(self.source, reason))
            }
        }
    }

    pub(crate) fn remove_values(
        &self,
        context: &mut PropagationContext<'_>,
        values: &RangeSet,
    ) -> Result<bool, Contradiction> {
        self.source.remove_values(context, &self.preimage(values))
    }

    pub(crate) fn remove_all_values_but(
        &self,
        context: &mut PropagationContext<'_>,
        values: &RangeSet,
    ) -> Result<bool, Contradiction> {
        self.source
            .remove_all_values_but(context, &self.preimage(values))
    }

    pub(crate) fn wipe_out(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        self.source.wipe_out(context)
    }
}

impl std::fmt::Debug for AffineView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scale == -1 {
            write!(f, "-")?;
        } else if self.scale != 1 {
            write!(f, "{} * ", self.scale)?;
        }

        write!(f, "({})", self.source)?;

        match self.offset.cmp(&0) {
            Ordering::Less => write!(f, " - {}", -self.offset)?,
            Ordering::Equal => {}
            Ordering::Greater => write!(f, " + {}", self.offset)?,
        }

        Ok(())
    }
}

enum Rounding {
    Up,
    Down,
}
