use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::{BoundedNumber, Constraint, Individual, MoError, Objective, ObjectiveDirection};

/// The data returned by the user-defined evaluation function with the values of the objectives
/// and constraints for one individual. Both vectors are ordered as the objectives and constraints
/// declared on the problem.
#[derive(Debug)]
pub struct EvaluationResult {
    /// The evaluated objective values.
    pub objectives: Vec<f64>,
    /// The evaluated constraint values. `None` for unconstrained problems.
    pub constraints: Option<Vec<f64>>,
}

/// The trait to implement the user-defined function to evaluate the problem objectives and
/// constraints for an individual. The evaluation of one individual must not depend on any other
/// individual so that, within one iteration, the evaluation may run in parallel threads.
pub trait Evaluator: Sync + Send + Debug {
    /// Evaluate the objectives and constraints for the given individual.
    ///
    /// # Arguments
    ///
    /// * `individual`: The individual with the variables to use in the calculation.
    ///
    /// returns: `Result<EvaluationResult, Box<dyn Error>>`
    fn evaluate(&self, individual: &Individual) -> Result<EvaluationResult, Box<dyn Error>>;
}

/// Define a new problem to optimise as:
///
///  Min/Max(f_1(x), f_2(x), ..., f_M(x))
///
/// where
///   - the integer M >= 1 is the number of objectives;
///   - x is the N-variable solution vector bounded to x_i^(L) <= x_i <= x_i^(U) with
///     i = 1, 2, ..., N.
///
/// The problem is also subject to J inequality constraints g_j(x) <= 0 with j = 1, 2, ..., J.
///
/// # Example
/// ```
///  use moframe::core::{BoundedNumber, Constraint, Objective, ObjectiveDirection, Problem};
///  use moframe::core::utils::dummy_evaluator;
///
///  // Define a one-objective one-variable problem with two constraints
///  let objectives = vec![Objective::new("obj1", ObjectiveDirection::Minimise)];
///  let variables = vec![BoundedNumber::new("X1", 0.0, 2.0).unwrap()];
///  let constraints = vec![Constraint::new("c1"), Constraint::new("c2")];
///
///  let problem = Problem::new(objectives, variables, Some(constraints), dummy_evaluator()).unwrap();
///  println!("{}", problem);
/// ```
#[derive(Debug)]
pub struct Problem {
    /// The problem objectives.
    objectives: Vec<Objective>,
    /// The problem decision variables.
    variables: Vec<BoundedNumber>,
    /// The problem constraints.
    constraints: Vec<Constraint>,
    /// The function used to evaluate the problem objectives and constraints.
    evaluator: Box<dyn Evaluator>,
}

#[derive(Serialize, Deserialize, Debug)]
/// The struct used to serialise the problem configuration.
pub struct ProblemExport {
    /// The problem objectives.
    pub objectives: Vec<Objective>,
    /// The problem decision variables.
    pub variables: Vec<BoundedNumber>,
    /// The problem constraints.
    pub constraints: Vec<Constraint>,
    /// The number of objectives.
    pub number_of_objectives: usize,
    /// The number of variables.
    pub number_of_variables: usize,
    /// The number of constraints.
    pub number_of_constraints: usize,
}

impl Problem {
    /// Initialise the problem. This returns an error if no objective or variable is provided, or
    /// two objectives, variables or constraints share the same name.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The vector of objectives to set on the problem.
    /// * `variables`: The vector of decision variables to set on the problem.
    /// * `constraints`: The optional vector of constraints.
    /// * `evaluator`: The function to use to evaluate the objective and constraint values.
    ///
    /// returns: `Result<Problem, MoError>`
    pub fn new(
        objectives: Vec<Objective>,
        variables: Vec<BoundedNumber>,
        constraints: Option<Vec<Constraint>>,
        evaluator: Box<dyn Evaluator>,
    ) -> Result<Self, MoError> {
        if objectives.is_empty() {
            return Err(MoError::NoObjective);
        }
        if variables.is_empty() {
            return Err(MoError::NoVariables);
        }
        let constraints = constraints.unwrap_or_default();

        Self::check_unique_names("objective", objectives.iter().map(|o| o.name()))?;
        Self::check_unique_names("variable", variables.iter().map(|v| v.name()))?;
        Self::check_unique_names("constraint", constraints.iter().map(|c| c.name()))?;

        for objective in &objectives {
            info!("Adding {}", objective);
        }
        for variable in &variables {
            info!("Adding {}", variable);
        }
        for constraint in &constraints {
            info!("Adding {}", constraint);
        }

        Ok(Self {
            objectives,
            variables,
            constraints,
            evaluator,
        })
    }

    /// Check that all names in the iterator are unique. This returns an error on the first
    /// duplicated name.
    fn check_unique_names<I: Iterator<Item = String>>(
        item: &str,
        names: I,
    ) -> Result<(), MoError> {
        let mut seen: HashSet<String> = HashSet::new();
        for name in names {
            if !seen.insert(name.clone()) {
                return Err(MoError::DuplicatedName(item.to_string(), name));
            }
        }
        Ok(())
    }

    /// Whether the objective at the given index is being minimised. This returns an error if the
    /// index does not exist.
    ///
    /// # Arguments
    ///
    /// * `index`: The objective index.
    ///
    /// returns: `Result<bool, MoError>`
    pub fn is_objective_minimised(&self, index: usize) -> Result<bool, MoError> {
        self.objectives
            .get(index)
            .map(|o| o.direction() == ObjectiveDirection::Minimise)
            .ok_or(MoError::NonExistingIndex("objective".to_string(), index))
    }

    /// Get the total number of objectives of the problem.
    ///
    /// return: `usize`
    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    /// Get the total number of variables of the problem.
    ///
    /// return: `usize`
    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get the total number of constraints of the problem.
    ///
    /// return: `usize`
    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get the problem objectives.
    ///
    /// return: `&[Objective]`
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Get the problem decision variables.
    ///
    /// return: `&[BoundedNumber]`
    pub fn variables(&self) -> &[BoundedNumber] {
        &self.variables
    }

    /// Get the lower and upper bounds of the variable at the given index. This returns an error
    /// if the index does not exist.
    ///
    /// # Arguments
    ///
    /// * `index`: The variable index.
    ///
    /// returns: `Result<(f64, f64), MoError>`
    pub fn variable_bounds(&self, index: usize) -> Result<(f64, f64), MoError> {
        self.variables
            .get(index)
            .map(|v| v.bounds())
            .ok_or(MoError::NonExistingIndex("variable".to_string(), index))
    }

    /// Get the problem constraints.
    ///
    /// return: `&[Constraint]`
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Get the function used to evaluate the problem objectives and constraints.
    ///
    /// return: `&dyn Evaluator`
    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// Serialise the problem configuration.
    ///
    /// return: `ProblemExport`
    pub fn serialise(&self) -> ProblemExport {
        ProblemExport {
            objectives: self.objectives.clone(),
            variables: self.variables.clone(),
            constraints: self.constraints.clone(),
            number_of_objectives: self.number_of_objectives(),
            number_of_variables: self.number_of_variables(),
            number_of_constraints: self.number_of_constraints(),
        }
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Problem with {} objectives, {} variables and {} constraints",
            self.number_of_objectives(),
            self.number_of_variables(),
            self.number_of_constraints()
        )
    }
}

/// Benchmark problems used in tests and demos.
pub mod builtin_problems {
    use std::error::Error;

    use crate::core::{
        BoundedNumber, EvaluationResult, Evaluator, Individual, MoError, Objective,
        ObjectiveDirection, Problem,
    };

    /// The Schaffer's study (SCH) problem.
    #[derive(Debug)]
    pub struct SCHProblem;

    impl SCHProblem {
        /// Create the problem for the optimisation.
        pub fn create() -> Result<Problem, MoError> {
            let objectives = vec![
                Objective::new("x^2", ObjectiveDirection::Minimise),
                Objective::new("(x-2)^2", ObjectiveDirection::Minimise),
            ];
            let variables = vec![BoundedNumber::new("x", -1000.0, 1000.0)?];

            let e = Box::new(SCHProblem);
            Problem::new(objectives, variables, None, e)
        }

        /// The first objective function.
        pub fn f1(x: f64) -> f64 {
            x.powi(2)
        }

        /// The second objective function.
        pub fn f2(x: f64) -> f64 {
            (x - 2.0).powi(2)
        }
    }

    impl Evaluator for SCHProblem {
        fn evaluate(&self, i: &Individual) -> Result<EvaluationResult, Box<dyn Error>> {
            let x = i.get_variable_value(0)?;
            Ok(EvaluationResult {
                objectives: vec![SCHProblem::f1(x), SCHProblem::f2(x)],
                constraints: None,
            })
        }
    }

    /// Problem #1 from Zitzler et al. (2000).
    #[derive(Debug)]
    pub struct ZDT1Problem {
        /// The number of variables.
        n: usize,
    }

    impl ZDT1Problem {
        /// Create the problem for the optimisation.
        ///
        /// # Arguments
        ///
        /// * `n`: The number of variables.
        pub fn create(n: usize) -> Result<Problem, MoError> {
            let objectives = vec![
                Objective::new("f1", ObjectiveDirection::Minimise),
                Objective::new("f2", ObjectiveDirection::Minimise),
            ];
            let mut variables: Vec<BoundedNumber> = Vec::with_capacity(n);
            for i in 1..=n {
                variables.push(BoundedNumber::new(format!("x{i}").as_str(), 0.0, 1.0)?);
            }

            let e = Box::new(ZDT1Problem { n });
            Problem::new(objectives, variables, None, e)
        }
    }

    impl Evaluator for ZDT1Problem {
        fn evaluate(&self, i: &Individual) -> Result<EvaluationResult, Box<dyn Error>> {
            let x = i.variables();
            let f1 = x[0];
            let g = 1.0 + 9.0 * x[1..self.n].iter().sum::<f64>() / (self.n as f64 - 1.0);
            let f2 = g * (1.0 - (f1 / g).sqrt());
            Ok(EvaluationResult {
                objectives: vec![f1, f2],
                constraints: None,
            })
        }
    }
}

#[cfg(test)]
mod test {
    use crate::core::utils::dummy_evaluator;
    use crate::core::{BoundedNumber, Objective, ObjectiveDirection, Problem};

    #[test]
    /// A problem must have at least one objective and one variable.
    fn test_empty_problem() {
        let variables = vec![BoundedNumber::new("X1", 0.0, 2.0).unwrap()];
        assert!(Problem::new(vec![], variables, None, dummy_evaluator()).is_err());

        let objectives = vec![Objective::new("obj1", ObjectiveDirection::Minimise)];
        assert!(Problem::new(objectives, vec![], None, dummy_evaluator()).is_err());
    }

    #[test]
    /// Duplicated names are rejected.
    fn test_duplicated_names() {
        let objectives = vec![
            Objective::new("obj1", ObjectiveDirection::Minimise),
            Objective::new("obj1", ObjectiveDirection::Maximise),
        ];
        let variables = vec![BoundedNumber::new("X1", 0.0, 2.0).unwrap()];
        assert!(Problem::new(objectives, variables, None, dummy_evaluator()).is_err());
    }
}
