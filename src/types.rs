use serde::{Deserialize, Serialize};

/// An action that must be bound to exactly one key. Its row order is the
/// order in which solvers assign it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub priority: f64,
}

impl Ability {
    pub fn new(name: impl Into<String>, priority: f64) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

/// Ordered chain of abilities used in sequence, e.g. `"A > B > C"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub name: String,
    pub priority: f64,
    pub indices: Vec<usize>,
}

impl Combination {
    pub fn new(name: impl Into<String>, priority: f64, indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            priority,
            indices,
        }
    }
}
