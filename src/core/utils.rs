use std::error::Error;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::{EvaluationResult, Evaluator, Individual};

/// Get the random number generator. If no seed is provided, a default seed is used.
///
/// # Arguments
///
/// * `seed`: The optional seed number.
///
/// returns: `Box<dyn RngCore>`
pub fn get_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    let rng = match seed {
        None => ChaCha8Rng::from_entropy(),
        Some(s) => ChaCha8Rng::seed_from_u64(s),
    };
    Box::new(rng)
}

/// Return a dummy evaluator. This is only used in tests and doc examples.
///
/// return: `Box<dyn Evaluator>`
#[doc(hidden)]
pub fn dummy_evaluator() -> Box<dyn Evaluator> {
    // dummy evaluator function
    #[derive(Debug)]
    struct UserEvaluator;
    impl Evaluator for UserEvaluator {
        fn evaluate(&self, i: &Individual) -> Result<EvaluationResult, Box<dyn Error>> {
            let problem = i.problem();
            Ok(EvaluationResult {
                objectives: vec![0.0; problem.number_of_objectives()],
                constraints: None,
            })
        }
    }

    Box::new(UserEvaluator)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::Arc;

    use crate::core::utils::{dummy_evaluator, get_rng};
    use crate::core::{BoundedNumber, Individual, Objective, ObjectiveDirection, Problem};

    /// Create the individuals for an `N`-objective dummy problem, where `N` is the number of
    /// items in the arrays of `objective_values`. All individuals are marked as evaluated.
    ///
    /// # Arguments
    ///
    /// * `objective_values`: The objective values to set on the individuals. A number of
    ///   individuals equal to the number of rows in this vector will be created.
    ///
    /// returns: `Vec<Individual>`
    pub(crate) fn individuals_from_obj_values<const N: usize>(
        objective_values: &[[f64; N]],
    ) -> Vec<Individual> {
        let mut objectives = Vec::new();
        for i in 0..N {
            objectives.push(Objective::new(
                format!("obj{i}").as_str(),
                ObjectiveDirection::Minimise,
            ));
        }
        let variables = vec![BoundedNumber::new("X", 0.0, 2.0).unwrap()];
        let problem =
            Arc::new(Problem::new(objectives, variables, None, dummy_evaluator()).unwrap());

        let mut rng = get_rng(Some(1));
        let mut individuals: Vec<Individual> = Vec::new();
        for data in objective_values {
            let mut individual = Individual::new(problem.clone(), &mut rng);
            for (i, obj_value) in data.iter().enumerate() {
                individual.update_objective(i, *obj_value).unwrap();
            }
            individual.set_evaluated();
            individuals.push(individual);
        }

        individuals
    }
}
