use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Define an inequality constraint for a problem. A constraint value is calculated by the
/// user-defined evaluation function and the constraint is met when the value is lower than or
/// equal to zero. The amount of violation of an unmet constraint is the positive part of its
/// value, so that the violations of all problem constraints can be summed into the overall
/// violation of a solution.
///
/// # Example
/// ```
///  use moframe::core::Constraint;
///
///  let c = Constraint::new("min capacity");
///  assert!(c.is_met(-0.3));
///  assert_eq!(c.violation(2.0), 2.0);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Constraint {
    /// The constraint name.
    name: String,
}

impl Constraint {
    /// Create a new constraint.
    ///
    /// # Arguments
    ///
    /// * `name`: The constraint name.
    ///
    /// returns: `Constraint`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Get the constraint name.
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// Whether the constraint is met for the given value.
    ///
    /// # Arguments
    ///
    /// * `value`: The constraint value calculated by the evaluation function.
    ///
    /// returns: `bool`
    pub fn is_met(&self, value: f64) -> bool {
        value <= 0.0
    }

    /// Calculate the amount of violation of the constraint for the given value. This is 0 when
    /// the constraint is met, otherwise the positive constraint value is returned.
    ///
    /// # Arguments
    ///
    /// * `value`: The constraint value calculated by the evaluation function.
    ///
    /// returns: `f64`
    pub fn violation(&self, value: f64) -> f64 {
        value.max(0.0)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Constraint '{}' <= 0", self.name)
    }
}

#[cfg(test)]
mod test {
    use crate::core::Constraint;

    #[test]
    /// A constraint is met when its value is negative or zero.
    fn test_is_met() {
        let c = Constraint::new("c1");
        assert!(c.is_met(-1.0));
        assert!(c.is_met(0.0));
        assert!(!c.is_met(0.1));
    }

    #[test]
    /// The violation is the positive part of the constraint value.
    fn test_violation() {
        let c = Constraint::new("c1");
        assert_eq!(c.violation(-5.0), 0.0);
        assert_eq!(c.violation(0.0), 0.0);
        assert_eq!(c.violation(3.0), 3.0);
    }
}
