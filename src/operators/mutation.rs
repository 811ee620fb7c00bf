use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::{Individual, MoError, Problem};

/// The trait to implement a mutation operator to modify the genetic material of an individual.
pub trait Mutation {
    /// Mutate a population individual.
    ///
    /// # Arguments
    ///
    /// * `individual`: The individual to mutate.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Individual, MoError>`. The mutated individual.
    fn mutate_offspring(
        &self,
        individual: &Individual,
        rng: &mut dyn RngCore,
    ) -> Result<Individual, MoError>;
}

/// Input arguments for [`PolynomialMutation`].
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PolynomialMutationArgs {
    /// A user-defined parameter to control the mutation. This is eta_m in the paper, and it is
    /// suggested its value to be in the [20, 100] range.
    pub index_parameter: f64,
    /// The probability of mutating a parent variable.
    pub variable_probability: f64,
}

impl PolynomialMutationArgs {
    /// Initialise the Polynomial mutation (PM) operator with the default parameters. With a
    /// distribution index or index parameter of 20 and variable probability equal 1 divided by
    /// the number of variables in the problem (i.e. each variable will have the same probability
    /// of being mutated).
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem being solved.
    ///
    /// returns: `Self`
    pub fn default(problem: &Problem) -> Self {
        let variable_probability = 1.0 / problem.number_of_variables() as f64;
        Self {
            index_parameter: 20.0,
            variable_probability,
        }
    }
}

/// The Polynomial mutation (PM) operator.
///
/// Adapted from [Deb & Deb (2014)](https://dl.acm.org/doi/10.1504/IJAISC.2014.059280), full
/// text available at <https://www.egr.msu.edu/~kdeb/papers/k2012016.pdf>
pub struct PolynomialMutation {
    /// The user-defined parameter to control the mutation.
    index_parameter: f64,
    /// The probability of mutating a parent variable.
    variable_probability: f64,
}

impl PolynomialMutation {
    /// Initialise the Polynomial mutation (PM) operator. This returns an error if the probability
    /// is outside the [0, 1] range.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator input parameters.
    ///
    /// returns: `Result<PolynomialMutation, MoError>`
    pub fn new(args: PolynomialMutationArgs) -> Result<Self, MoError> {
        if !(0.0..=1.0).contains(&args.variable_probability) {
            return Err(MoError::MutationOperator(
                "PolynomialMutation".to_string(),
                format!(
                    "The variable probability {} must be a number between 0 and 1",
                    args.variable_probability
                ),
            ));
        }
        Ok(Self {
            index_parameter: args.index_parameter,
            variable_probability: args.variable_probability,
        })
    }
}

impl Mutation for PolynomialMutation {
    fn mutate_offspring(
        &self,
        individual: &Individual,
        rng: &mut dyn RngCore,
    ) -> Result<Individual, MoError> {
        let mut mutated_individual = individual.clone_variables();
        let problem = individual.problem();

        for var_index in 0..problem.number_of_variables() {
            if rng.gen_range(0.0..=1.0) <= self.variable_probability {
                let y = individual.get_variable_value(var_index)?;
                let (y_lower, y_upper) = problem.variable_bounds(var_index)?;

                let delta_y = y_upper - y_lower;
                let prob = rng.gen_range(0.0..=1.0);

                // this is delta_l or delta_r
                let delta = if prob <= 0.5 {
                    let bl = (y - y_lower) / delta_y;
                    let b = 2.0 * prob
                        + (1.0 - 2.0 * prob) * f64::powf(1.0 - bl, self.index_parameter + 1.0);
                    f64::powf(b, 1.0 / (self.index_parameter + 1.0)) - 1.0
                } else {
                    let bu = (y_upper - y) / delta_y;
                    let b = 2.0 * (1.0 - prob)
                        + 2.0 * (prob - 0.5) * f64::powf(1.0 - bu, self.index_parameter + 1.0);
                    1.0 - f64::powf(b, 1.0 / (self.index_parameter + 1.0))
                };

                // adjust the variable
                let mut new_y = y + delta * delta_y;
                new_y = f64::min(f64::max(new_y, y_lower), y_upper);
                mutated_individual.update_variable(var_index, new_y)?;
            }
        }

        Ok(mutated_individual)
    }
}
