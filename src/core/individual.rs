use std::fmt::{Display, Formatter};
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::{MoError, Problem};

/// The auxiliary data attached to an individual by the survival machinery. The non-dominated
/// sorting stores the front index here and the density estimator the crowding distance; both are
/// unset until the corresponding step has run on the individual.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SurvivalMetadata {
    /// The front index assigned by the non-dominated sorting (0 is the non-dominated front).
    rank: Option<usize>,
    /// The crowding distance assigned by the density estimator.
    crowding_distance: Option<f64>,
}

/// An individual in the population containing the problem solution, and the objective and
/// constraint values.
///
/// # Example
/// ```
/// use std::error::Error;
/// use std::sync::Arc;
/// use moframe::core::{BoundedNumber, Individual, Objective, ObjectiveDirection, Problem};
/// use moframe::core::utils::{dummy_evaluator, get_rng};
///
/// fn main() -> Result<(), Box<dyn Error>> {
///     let objectives = vec![Objective::new("obj1", ObjectiveDirection::Minimise)];
///     let variables = vec![BoundedNumber::new("var1", 0.0, 2.0)?];
///
///     // create a new one-variable problem
///     let problem = Arc::new(Problem::new(objectives, variables, None, dummy_evaluator())?);
///
///     // create an individual and set the calculated variable
///     let mut a = Individual::new(problem, &mut get_rng(None));
///     a.update_variable(0, 0.2)?;
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Individual {
    /// The problem being solved.
    problem: Arc<Problem>,
    /// The value of the problem variables for the individual.
    variables: Vec<f64>,
    /// The values of the objectives. Maximised objectives are stored with inverted sign so that
    /// the rest of the library always minimises.
    objectives: Vec<f64>,
    /// The values of the constraints.
    constraints: Vec<f64>,
    /// Whether the individual has been evaluated and the problem constraint and objective values
    /// are available. When an individual is created with new variables after the population
    /// evolves, constraints and objectives need to be evaluated using the user-defined function.
    evaluated: bool,
    /// The rank and crowding distance set by the survival machinery.
    survival: SurvivalMetadata,
}

#[derive(Serialize, Deserialize, Debug)]
/// The struct used to serialise an individual.
pub struct IndividualExport {
    /// The value of the problem variables for the individual.
    pub variables: Vec<f64>,
    /// The values of the objectives.
    pub objectives: Vec<f64>,
    /// The value of the constraints.
    pub constraints: Vec<f64>,
    /// The overall amount of violation of the solution constraints.
    pub constraint_violation: f64,
    /// Whether the solution meets all the problem constraints.
    pub is_feasible: bool,
}

impl Display for Individual {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Individual(variables={:?}, objectives={:?}, constraints={:?})",
            self.variables, self.objectives, self.constraints,
        )
    }
}

impl Individual {
    /// Create a new individual with random variable values within the problem bounds. The
    /// objective and constraint values are set when the individual is evaluated.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem being solved.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Individual`
    pub fn new(problem: Arc<Problem>, rng: &mut dyn RngCore) -> Self {
        let variables = problem
            .variables()
            .iter()
            .map(|v| v.generate_random_value(rng))
            .collect();
        let objectives = vec![f64::NAN; problem.number_of_objectives()];
        let constraints = vec![f64::NAN; problem.number_of_constraints()];

        Self {
            problem,
            variables,
            objectives,
            constraints,
            evaluated: false,
            survival: SurvivalMetadata::default(),
        }
    }

    /// Get the problem being solved with the individual.
    ///
    /// return: `Arc<Problem>`
    pub fn problem(&self) -> Arc<Problem> {
        self.problem.clone()
    }

    /// Clone an individual by preserving only its variable values. The clone is not evaluated
    /// and carries no survival metadata.
    ///
    /// return: `Individual`
    pub fn clone_variables(&self) -> Self {
        Self {
            problem: self.problem.clone(),
            variables: self.variables.clone(),
            objectives: vec![f64::NAN; self.problem.number_of_objectives()],
            constraints: vec![f64::NAN; self.problem.number_of_constraints()],
            evaluated: false,
            survival: SurvivalMetadata::default(),
        }
    }

    /// Get all the variable values.
    ///
    /// returns: `&[f64]`
    pub fn variables(&self) -> &[f64] {
        &self.variables
    }

    /// Update the variable at the given index. This returns an error if the index does not exist
    /// on the problem.
    ///
    /// # Arguments
    ///
    /// * `index`: The variable index.
    /// * `value`: The value to set.
    ///
    /// returns: `Result<(), MoError>`
    pub fn update_variable(&mut self, index: usize, value: f64) -> Result<(), MoError> {
        let x = self
            .variables
            .get_mut(index)
            .ok_or(MoError::NonExistingIndex("variable".to_string(), index))?;
        *x = value;
        Ok(())
    }

    /// Get the variable value at the given index. This returns an error if the index does not
    /// exist on the problem.
    ///
    /// # Arguments
    ///
    /// * `index`: The variable index.
    ///
    /// returns: `Result<f64, MoError>`
    pub fn get_variable_value(&self, index: usize) -> Result<f64, MoError> {
        self.variables
            .get(index)
            .copied()
            .ok_or(MoError::NonExistingIndex("variable".to_string(), index))
    }

    /// Update the objective at the given index. The value is stored with inverted sign if the
    /// objective is being maximised. This returns an error if the index does not exist on the
    /// problem or the value is `NaN`.
    ///
    /// # Arguments
    ///
    /// * `index`: The objective index.
    /// * `value`: The value to set.
    ///
    /// returns: `Result<(), MoError>`
    pub fn update_objective(&mut self, index: usize, value: f64) -> Result<(), MoError> {
        if value.is_nan() {
            return Err(MoError::NaN(format!("objective #{index}")));
        }
        // invert the sign for maximisation problems
        let sign = if self.problem.is_objective_minimised(index)? {
            1.0
        } else {
            -1.0
        };
        let x = self
            .objectives
            .get_mut(index)
            .ok_or(MoError::NonExistingIndex("objective".to_string(), index))?;
        *x = sign * value;
        Ok(())
    }

    /// Get the stored objective value at the given index. Maximised objectives are returned in
    /// minimise-space (sign-inverted). This returns an error if the index does not exist.
    ///
    /// # Arguments
    ///
    /// * `index`: The objective index.
    ///
    /// returns: `Result<f64, MoError>`
    pub fn get_objective_value(&self, index: usize) -> Result<f64, MoError> {
        self.objectives
            .get(index)
            .copied()
            .ok_or(MoError::NonExistingIndex("objective".to_string(), index))
    }

    /// Get all the stored objective values (in minimise-space).
    ///
    /// returns: `&[f64]`
    pub fn objective_values(&self) -> &[f64] {
        &self.objectives
    }

    /// Update the constraint at the given index. This returns an error if the index does not
    /// exist on the problem or the value is `NaN`.
    ///
    /// # Arguments
    ///
    /// * `index`: The constraint index.
    /// * `value`: The value to set.
    ///
    /// returns: `Result<(), MoError>`
    pub fn update_constraint(&mut self, index: usize, value: f64) -> Result<(), MoError> {
        if value.is_nan() {
            return Err(MoError::NaN(format!("constraint #{index}")));
        }
        let x = self
            .constraints
            .get_mut(index)
            .ok_or(MoError::NonExistingIndex("constraint".to_string(), index))?;
        *x = value;
        Ok(())
    }

    /// Get the constraint value at the given index. This returns an error if the index does not
    /// exist on the problem.
    ///
    /// # Arguments
    ///
    /// * `index`: The constraint index.
    ///
    /// returns: `Result<f64, MoError>`
    pub fn get_constraint_value(&self, index: usize) -> Result<f64, MoError> {
        self.constraints
            .get(index)
            .copied()
            .ok_or(MoError::NonExistingIndex("constraint".to_string(), index))
    }

    /// Calculate the overall amount of violation of the solution constraints. This is a measure
    /// about how close (or far) the individual is from meeting the constraints. If the solution
    /// is feasible, the violation is 0.0. Otherwise, a positive number is returned.
    ///
    /// return: `f64`
    pub fn constraint_violation(&self) -> f64 {
        self.problem
            .constraints()
            .iter()
            .zip(&self.constraints)
            .map(|(c, value)| c.violation(*value))
            .sum()
    }

    /// Return whether the solution meets all the problem constraints.
    ///
    /// return: `bool`
    pub fn is_feasible(&self) -> bool {
        self.problem
            .constraints()
            .iter()
            .zip(&self.constraints)
            .all(|(c, value)| c.is_met(*value))
    }

    /// Whether the individual has been evaluated.
    ///
    /// return: `bool`
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Mark the individual as evaluated. Only the evaluation step should call this, once all the
    /// objective and constraint values have been set.
    pub fn set_evaluated(&mut self) {
        self.evaluated = true;
    }

    /// Set the individual front index. 0 is the non-dominated front.
    ///
    /// # Arguments
    ///
    /// * `rank`: The front index.
    pub fn set_rank(&mut self, rank: usize) {
        self.survival.rank = Some(rank);
    }

    /// Get the front index set by the non-dominated sorting, if available.
    ///
    /// return: `Option<usize>`
    pub fn rank(&self) -> Option<usize> {
        self.survival.rank
    }

    /// Set the individual crowding distance.
    ///
    /// # Arguments
    ///
    /// * `distance`: The crowding distance.
    pub fn set_crowding_distance(&mut self, distance: f64) {
        self.survival.crowding_distance = Some(distance);
    }

    /// Get the crowding distance set by the density estimator, if available.
    ///
    /// return: `Option<f64>`
    pub fn crowding_distance(&self) -> Option<f64> {
        self.survival.crowding_distance
    }

    /// Export the solution data (variable, constraint and objective values, constraint violation
    /// and feasibility).
    ///
    /// return: `IndividualExport`
    pub fn export(&self) -> IndividualExport {
        IndividualExport {
            variables: self.variables.clone(),
            objectives: self.objectives.clone(),
            constraints: self.constraints.clone(),
            constraint_violation: self.constraint_violation(),
            is_feasible: self.is_feasible(),
        }
    }
}

/// The population with the solutions.
#[derive(Clone, Debug, Default)]
pub struct Population(pub Vec<Individual>);

impl Population {
    /// Create an empty population.
    ///
    /// return: `Population`
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Get the population individuals.
    ///
    /// return: `&[Individual]`
    pub fn individuals(&self) -> &[Individual] {
        self.0.as_ref()
    }

    /// Get the population individuals as a mutable slice.
    ///
    /// return: `&mut [Individual]`
    pub fn individuals_as_mut(&mut self) -> &mut [Individual] {
        self.0.as_mut()
    }

    /// Get the population size.
    ///
    /// return: `usize`
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the population has no individuals.
    ///
    /// return: `bool`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add new individuals to the population.
    ///
    /// # Arguments
    ///
    /// * `individuals`: The vector of individuals to add.
    pub fn add_new_individuals(&mut self, individuals: Vec<Individual>) {
        self.0.extend(individuals);
    }

    /// Generate a population with `number_of_individuals` individuals with random variable
    /// values within the problem bounds.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem being solved.
    /// * `number_of_individuals`: The number of individuals to add to the population.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Population`
    pub fn init(
        problem: Arc<Problem>,
        number_of_individuals: usize,
        rng: &mut dyn RngCore,
    ) -> Self {
        let mut population: Vec<Individual> = Vec::with_capacity(number_of_individuals);
        for _ in 0..number_of_individuals {
            population.push(Individual::new(problem.clone(), rng));
        }
        Self(population)
    }

    /// Serialise the population individuals.
    ///
    /// return: `Vec<IndividualExport>`
    pub fn serialise(&self) -> Vec<IndividualExport> {
        self.0.iter().map(|i| i.export()).collect()
    }
}
