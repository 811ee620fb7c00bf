use crate::core::{Individual, MoError};

/// The preferred solution with the `BinaryComparisonOperator`.
#[derive(Debug, PartialOrd, PartialEq)]
pub enum PreferredSolution {
    /// The first solution is preferred.
    First,
    /// The second solution is preferred.
    Second,
    /// The two solutions are mutually preferred.
    MutuallyPreferred,
}

/// A trait to implement a comparison operator between two solutions.
pub trait BinaryComparisonOperator {
    /// Compare two solutions and select the best one.
    ///
    /// # Arguments
    ///
    /// * `first_solution`: The first solution to compare.
    /// * `second_solution`: The second solution to compare.
    ///
    /// returns: `Result<PreferredSolution, MoError>` The preferred solution.
    fn compare(
        first_solution: &Individual,
        second_solution: &Individual,
    ) -> Result<PreferredSolution, MoError>
    where
        Self: Sized;
}

/// This assesses the Pareto dominance between two solutions S1 and S2 and their constraint
/// violations in constrained multi-objective optimisation problems. A solution S1
/// constraint-dominates S2 if:
/// 1) S1 is feasible but S2 is not;
/// 2) both S1 and S2 are infeasible and CV(S1) < CV(S2) (where CV is the overall constraint
///    violation); or
/// 3) both are feasible and S1 Pareto-dominates S2.
///
/// Ties are never broken here; two mutually non-dominated solutions (including solutions with
/// identical objective vectors) are reported as mutually preferred and left to the density
/// estimator.
///
/// See:
///  - Kalyanmoy Deb & Samir Agrawal. (2002). <https://doi.org/10.1007/978-3-7091-6384-9_40>.
///  - Shuang Li, Ke Li, Wei Li. (2022). <https://doi.org/10.48550/arXiv.2205.14349>.
pub struct ParetoConstrainedDominance;

impl ParetoConstrainedDominance {
    /// Check that the two solutions have been evaluated and share the objective vector size.
    fn check_solutions(
        first_solution: &Individual,
        second_solution: &Individual,
    ) -> Result<(), MoError> {
        if !first_solution.is_evaluated() || !second_solution.is_evaluated() {
            return Err(MoError::InvalidInput(
                "both solutions must be evaluated before being compared".to_string(),
            ));
        }
        let s1_size = first_solution.objective_values().len();
        let s2_size = second_solution.objective_values().len();
        if s1_size != s2_size {
            return Err(MoError::DimensionMismatch(
                "objectives".to_string(),
                s1_size,
                s2_size,
            ));
        }
        Ok(())
    }
}

impl BinaryComparisonOperator for ParetoConstrainedDominance {
    /// Get the dominance relation between two solutions with constraints.
    ///
    /// # Arguments
    ///
    /// * `first_solution`: The first solution to compare.
    /// * `second_solution`: The second solution to compare.
    ///
    /// returns: `Result<PreferredSolution, MoError>` The dominance relation between solution 1
    /// and 2.
    fn compare(
        first_solution: &Individual,
        second_solution: &Individual,
    ) -> Result<PreferredSolution, MoError> {
        Self::check_solutions(first_solution, second_solution)?;

        let problem = first_solution.problem();

        // at least one solution is not feasible (step 1-2)
        if problem.number_of_constraints() > 0 {
            let cv1 = first_solution.constraint_violation();
            let cv2 = second_solution.constraint_violation();
            if cv1 < cv2 {
                // solution 1 dominates by feasibility
                return Ok(PreferredSolution::First);
            } else if cv1 > cv2 {
                // solution 2 dominates by feasibility
                return Ok(PreferredSolution::Second);
            }
        }

        // check Pareto dominance using all the objectives (step 3). Objective values are stored
        // in minimise-space, lower is always better.
        let mut relation = PreferredSolution::MutuallyPreferred;
        for (obj_sol1, obj_sol2) in first_solution
            .objective_values()
            .iter()
            .zip(second_solution.objective_values())
        {
            if obj_sol1 < obj_sol2 {
                if relation == PreferredSolution::Second {
                    // mutually dominated
                    return Ok(PreferredSolution::MutuallyPreferred);
                }
                relation = PreferredSolution::First;
            } else if obj_sol1 > obj_sol2 {
                if relation == PreferredSolution::First {
                    // mutually dominated
                    return Ok(PreferredSolution::MutuallyPreferred);
                }
                relation = PreferredSolution::Second;
            }
        }

        Ok(relation)
    }
}

/// The crowded-comparison operator from Deb et al. (2002). A solution with a lower front index
/// wins; between solutions of the same front the one with the larger crowding distance (i.e. in
/// the less crowded region) wins. Both solutions must have been ranked and, when the ranks tie,
/// carry a crowding distance.
pub struct CrowdedComparison;

impl BinaryComparisonOperator for CrowdedComparison {
    /// Get the crowded-comparison relation between two solutions.
    ///
    /// # Arguments
    ///
    /// * `first_solution`: The first solution to compare.
    /// * `second_solution`: The second solution to compare.
    ///
    /// returns: `Result<PreferredSolution, MoError>`
    fn compare(
        first_solution: &Individual,
        second_solution: &Individual,
    ) -> Result<PreferredSolution, MoError> {
        let rank1 = first_solution.rank().ok_or_else(|| {
            MoError::ComparisonOperator(
                "CrowdedComparison".to_string(),
                "the first solution has no rank set".to_string(),
            )
        })?;
        let rank2 = second_solution.rank().ok_or_else(|| {
            MoError::ComparisonOperator(
                "CrowdedComparison".to_string(),
                "the second solution has no rank set".to_string(),
            )
        })?;

        if rank1 != rank2 {
            return if rank1 < rank2 {
                Ok(PreferredSolution::First)
            } else {
                Ok(PreferredSolution::Second)
            };
        }

        let d1 = first_solution.crowding_distance().ok_or_else(|| {
            MoError::ComparisonOperator(
                "CrowdedComparison".to_string(),
                "the first solution has no crowding distance set".to_string(),
            )
        })?;
        let d2 = second_solution.crowding_distance().ok_or_else(|| {
            MoError::ComparisonOperator(
                "CrowdedComparison".to_string(),
                "the second solution has no crowding distance set".to_string(),
            )
        })?;

        if d1 > d2 {
            Ok(PreferredSolution::First)
        } else if d1 < d2 {
            Ok(PreferredSolution::Second)
        } else {
            Ok(PreferredSolution::MutuallyPreferred)
        }
    }
}
