use std::fmt::{Display, Formatter};

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::MoError;

/// A real decision variable bounded between a lower and an upper value.
///
/// # Example
/// ```
///  use moframe::core::BoundedNumber;
///
///  let x = BoundedNumber::new("x", 0.0, 2.0).unwrap();
///  println!("{}", x);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoundedNumber {
    /// The variable name.
    name: String,
    /// The minimum value bound.
    min_value: f64,
    /// The maximum value bound.
    max_value: f64,
}

impl BoundedNumber {
    /// Create a new decision variable. When a new value is generated for this variable, the value
    /// will be picked such that `min_value` <= value <= `max_value`.
    ///
    /// # Arguments
    ///
    /// * `name`: The variable name.
    /// * `min_value`: The lower bound.
    /// * `max_value`: The upper bound.
    ///
    /// returns: `Result<BoundedNumber, MoError>`
    pub fn new(name: &str, min_value: f64, max_value: f64) -> Result<Self, MoError> {
        if min_value >= max_value {
            return Err(MoError::Configuration(
                format!("variable '{name}'"),
                format!(
                    "the min value ({min_value}) must be strictly smaller than the max value ({max_value})"
                ),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            min_value,
            max_value,
        })
    }

    /// Get the variable name.
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// Get the variable lower and upper bounds.
    ///
    /// returns: `(f64, f64)`
    pub fn bounds(&self) -> (f64, f64) {
        (self.min_value, self.max_value)
    }

    /// Randomly generate a new value within the variable bounds.
    ///
    /// # Arguments
    ///
    /// * `rng`: The random number generator.
    ///
    /// returns: `f64`
    pub fn generate_random_value(&self, rng: &mut dyn RngCore) -> f64 {
        rng.gen_range(self.min_value..=self.max_value)
    }

    /// Clamp a value to the variable bounds.
    ///
    /// # Arguments
    ///
    /// * `value`: The value to clamp.
    ///
    /// returns: `f64`
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min_value, self.max_value)
    }
}

impl Display for BoundedNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoundedNumber '{}' to [{}; {}]",
            self.name, self.min_value, self.max_value
        )
    }
}

#[cfg(test)]
mod test {
    use crate::core::utils::get_rng;
    use crate::core::BoundedNumber;

    #[test]
    /// Test when the lower bound is larger than the upper bound.
    fn test_wrong_bounds() {
        assert!(BoundedNumber::new("x", 5.0, 1.0).is_err());
        assert!(BoundedNumber::new("x", 5.0, 5.0).is_err());
    }

    #[test]
    /// Generated values must stay within the bounds.
    fn test_random_value_within_bounds() {
        let x = BoundedNumber::new("x", -1.0, 3.0).unwrap();
        let mut rng = get_rng(Some(1));
        for _ in 0..100 {
            let value = x.generate_random_value(&mut rng);
            assert!((-1.0..=3.0).contains(&value));
        }
        assert_eq!(x.clamp(10.0), 3.0);
        assert_eq!(x.clamp(-10.0), -1.0);
    }
}
