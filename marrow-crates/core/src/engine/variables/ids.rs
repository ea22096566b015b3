use std::fmt::Display;

use crate::containers::StorageKey;

/// Handle to a variable owned by a [`Model`](crate::engine::model::Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId {
    id: u32,
}

impl StorageKey for VarId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VarId { id: index as u32 }
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// Handle to an [`AffineView`](super::AffineView) owned by a
/// [`Model`](crate::engine::model::Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId {
    id: u32,
}

impl StorageKey for ViewId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ViewId { id: index as u32 }
    }
}

impl Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view{}", self.id)
    }
}

/// Either a variable or a view, the things monitors and propagators can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableRef {
    Variable(VarId),
    View(ViewId),
}

impl From<VarId> for VariableRef {
    fn from(variable: VarId) -> Self {
        VariableRef::Variable(variable)
    }
}

impl From<ViewId> for VariableRef {
    fn from(view: ViewId) -> Self {
        VariableRef::View(view)
    }
}

impl Display for VariableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableRef::Variable(variable) => variable.fmt(f),
            VariableRef::View(view) => view.fmt(f),
        }
    }
}
