use crate::core::{Individual, MoError};
use crate::operators::{BinaryComparisonOperator, ParetoConstrainedDominance, PreferredSolution};

/// Outputs of the non-dominated sort algorithm.
pub struct NonDominatedSortResults {
    /// A vector containing sub-vectors. Each child vector represents a front (with the first being
    /// the primary non-dominated front with solutions of rank 0); each child vector contains
    /// the individuals belonging to that front.
    pub fronts: Vec<Vec<Individual>>,
    /// This is [`NonDominatedSortResults::fronts`], but the individuals are given as indexes
    /// instead of copies. Each index refers to the vector of individuals passed to
    /// [`fast_non_dominated_sort`].
    pub front_indexes: Vec<Vec<usize>>,
    /// Number of individuals that dominates a solution at a given vector index. When the counter
    /// is 0, the solution is non-dominated. This is `n_p` in the paper.
    pub domination_counter: Vec<usize>,
}

/// Non-dominated fast sorting (with complexity $O(M * N^2)$, where `M` is the number of
/// objectives and `N` the number of individuals).
///
/// This sorts solutions into fronts and ranks the individuals based on the number of solutions
/// an individual dominates. Solutions that are not dominated by any other individual belong to
/// the first front and get rank 0; each following front gets the next rank. The method also
/// stores the rank on each individual; to retrieve it, use [`Individual::rank`]. An empty or
/// one-individual slice is sorted trivially.
///
/// Implemented based on paragraph 3A in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// # Arguments
///
/// * `individuals`: The individuals to sort.
///
/// returns: `Result<NonDominatedSortResults, MoError>`.
pub fn fast_non_dominated_sort(
    individuals: &mut [Individual],
) -> Result<NonDominatedSortResults, MoError> {
    if individuals.is_empty() {
        return Ok(NonDominatedSortResults {
            fronts: Vec::new(),
            front_indexes: Vec::new(),
            domination_counter: Vec::new(),
        });
    }

    // check all the individuals upfront so that a one-individual slice is validated too
    let number_of_objectives = individuals[0].objective_values().len();
    for individual in individuals.iter() {
        if !individual.is_evaluated() {
            return Err(MoError::InvalidInput(
                "all individuals must be evaluated before being sorted".to_string(),
            ));
        }
        let size = individual.objective_values().len();
        if size != number_of_objectives {
            return Err(MoError::DimensionMismatch(
                "objectives".to_string(),
                number_of_objectives,
                size,
            ));
        }
    }

    // this set contains all the individuals being dominated by an individual `p`. This is `S_p` in
    // the paper
    let mut dominated_solutions: Vec<Vec<usize>> = individuals.iter().map(|_| Vec::new()).collect();
    // number of individuals that dominates `p`. When the counter is 0, `p` is non-dominated. This
    // is `n_p` in the paper
    let mut domination_counter: Vec<usize> = individuals.iter().map(|_| 0).collect();

    // the front of given rank containing non-dominated solutions
    let mut current_front: Vec<usize> = Vec::new();
    // the vector with all fronts of sorted ranks. The first item has rank 0 and subsequent
    // elements have increasing rank
    let mut all_fronts: Vec<Vec<usize>> = Vec::new();

    for pi in 0..individuals.len() {
        for qi in (pi + 1)..individuals.len() {
            match ParetoConstrainedDominance::compare(&individuals[pi], &individuals[qi])? {
                PreferredSolution::First => {
                    // `p` dominates `q` - add `q` to the set of solutions dominated by `p`
                    dominated_solutions[pi].push(qi);
                    domination_counter[qi] += 1;
                }
                PreferredSolution::Second => {
                    // `q` dominates `p`
                    dominated_solutions[qi].push(pi);
                    domination_counter[pi] += 1;
                }
                PreferredSolution::MutuallyPreferred => {
                    // skip this
                }
            }
        }
    }
    for pi in 0..individuals.len() {
        // the solution `p` is not dominated by any other and belongs to the first front
        if domination_counter[pi] == 0 {
            current_front.push(pi);
            individuals[pi].set_rank(0);
        }
    }
    all_fronts.push(current_front.clone());
    let e_domination_counter = domination_counter.clone();

    // collect the other fronts
    let mut rank = 0;
    loop {
        let mut next_front: Vec<usize> = Vec::new();
        // loop individuals in the current non-dominated front
        for pi in current_front.iter() {
            // loop solutions that are dominated by `p` in the current front
            for qi in dominated_solutions[*pi].iter() {
                // decrement the domination count for individual `q`
                domination_counter[*qi] -= 1;

                // if counter is 0 then none of the individuals in the subsequent fronts are
                // dominated by `p` and `q` belongs to the next front
                if domination_counter[*qi] == 0 {
                    next_front.push(*qi);
                    individuals[*qi].set_rank(rank + 1);
                }
            }
        }
        rank += 1;

        // stop when all solutions have been ranked
        if next_front.is_empty() {
            break;
        }

        all_fronts.push(next_front.clone());
        current_front = next_front;
    }

    // map index to individuals
    let mut fronts: Vec<Vec<Individual>> = Vec::new();
    for front in &all_fronts {
        let mut sub_front: Vec<Individual> = Vec::new();
        for i in front {
            sub_front.push(individuals[*i].clone());
        }
        fronts.push(sub_front);
    }

    Ok(NonDominatedSortResults {
        fronts,
        front_indexes: all_fronts,
        domination_counter: e_domination_counter,
    })
}

#[cfg(test)]
mod test {
    use crate::core::utils::get_rng;
    use crate::core::utils::test_utils::individuals_from_obj_values;
    use crate::core::Individual;
    use crate::utils::fast_non_dominated_sort;

    #[test]
    /// Test the non-dominated sorting. The resulting fronts and ranks were manually calculated by
    /// plotting the objective values.
    fn test_sorting_2obj() {
        let objectives = [
            [1.1, 8.1],
            [2.1, 6.1],
            [3.1, 4.1],
            [3.1, 7.1],
            [5.1, 3.1],
            [5.1, 5.1],
            [7.1, 7.1],
            [8.1, 2.1],
            [10.1, 6.1],
            [11.1, 1.1],
            [11.1, 3.1],
        ];
        let mut individuals = individuals_from_obj_values(&objectives);
        let result = fast_non_dominated_sort(&mut individuals).unwrap();

        // non-dominated front
        let expected_first = vec![0, 1, 2, 4, 7, 9];
        assert_eq!(result.front_indexes[0], expected_first);
        for idx in &expected_first {
            assert_eq!(individuals[*idx].rank().unwrap(), 0);
        }

        // other fronts
        let expected_second = vec![3, 5, 10];
        assert_eq!(result.front_indexes[1], expected_second);
        for idx in expected_second {
            assert_eq!(individuals[idx].rank().unwrap(), 1);
        }

        let expected_third = vec![6, 8];
        assert_eq!(result.front_indexes[2], expected_third);
        for idx in expected_third {
            assert_eq!(individuals[idx].rank().unwrap(), 2);
        }

        // check counter for some solutions
        for idx in expected_first {
            assert_eq!(result.domination_counter[idx], 0);
        }
        // by 2 and 4
        assert_eq!(result.domination_counter[5], 2);
        // by 1, 2, 4, 5 and 7
        assert_eq!(result.domination_counter[8], 5);
        // by 1 and 2
        assert_eq!(result.domination_counter[3], 2);
    }

    #[test]
    /// Test the non-dominated sorting with three objectives.
    fn test_sorting_3obj() {
        let objectives = [
            [2.1, 3.1, 4.1],
            [-1.1, 4.1, 8.1],
            [0.1, -1.1, -2.1],
            [0.1, 0.1, 0.1],
        ];
        let mut individuals = individuals_from_obj_values(&objectives);
        let result = fast_non_dominated_sort(&mut individuals).unwrap();

        let expected_first = vec![1, 2];
        assert_eq!(result.front_indexes[0], expected_first);
        for idx in &expected_first {
            assert_eq!(individuals[*idx].rank().unwrap(), 0);
        }

        let expected_second = vec![3];
        assert_eq!(result.front_indexes[1], expected_second);
        assert_eq!(individuals[3].rank().unwrap(), 1);

        let expected_third = vec![0];
        assert_eq!(result.front_indexes[2], expected_third);
        assert_eq!(individuals[0].rank().unwrap(), 2);

        // check counter for some solutions
        for idx in expected_first {
            assert_eq!(result.domination_counter[idx], 0);
        }
        assert_eq!(result.domination_counter[0], 2);
        assert_eq!(result.domination_counter[3], 1);
    }

    #[test]
    /// A chain of strictly dominating solutions yields one singleton front per solution.
    fn test_sorting_chain() {
        let objectives = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        let mut individuals = individuals_from_obj_values(&objectives);
        let result = fast_non_dominated_sort(&mut individuals).unwrap();

        assert_eq!(result.front_indexes, vec![vec![0], vec![1], vec![2]]);
        for (idx, individual) in individuals.iter().enumerate() {
            assert_eq!(individual.rank().unwrap(), idx);
        }
    }

    #[test]
    /// Mutually non-dominated solutions, including duplicated objective vectors, all belong to
    /// the first front.
    fn test_sorting_single_front() {
        let objectives = [[0.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
        let mut individuals = individuals_from_obj_values(&objectives);
        let result = fast_non_dominated_sort(&mut individuals).unwrap();

        assert_eq!(result.front_indexes, vec![vec![0, 1, 2]]);
        for individual in &individuals {
            assert_eq!(individual.rank().unwrap(), 0);
        }
    }

    #[test]
    /// An unevaluated individual cannot be sorted, even when it is the only one and the pairwise
    /// comparison never runs.
    fn test_sorting_unevaluated_individual() {
        let individuals = individuals_from_obj_values(&[[1.0, 2.0]]);
        let problem = individuals[0].problem();

        let mut unevaluated = vec![Individual::new(problem, &mut get_rng(Some(1)))];
        assert!(fast_non_dominated_sort(&mut unevaluated).is_err());
        assert!(unevaluated[0].rank().is_none());
    }

    #[test]
    /// Empty and one-individual inputs are sorted trivially.
    fn test_sorting_degenerate_inputs() {
        let mut empty: Vec<Individual> = Vec::new();
        let result = fast_non_dominated_sort(&mut empty).unwrap();
        assert!(result.fronts.is_empty());

        let mut individuals = individuals_from_obj_values(&[[1.0, 2.0]]);
        let result = fast_non_dominated_sort(&mut individuals).unwrap();
        assert_eq!(result.front_indexes, vec![vec![0]]);
        assert_eq!(individuals[0].rank().unwrap(), 0);
    }

    #[test]
    /// Running the sort twice leaves fronts and ranks unchanged.
    fn test_sorting_idempotence() {
        let objectives = [[0.0, 0.0], [1.0, 1.0], [0.5, 0.7], [0.7, 0.5]];
        let mut individuals = individuals_from_obj_values(&objectives);
        let first = fast_non_dominated_sort(&mut individuals).unwrap();
        let second = fast_non_dominated_sort(&mut individuals).unwrap();
        assert_eq!(first.front_indexes, second.front_indexes);
        assert_eq!(first.domination_counter, second.domination_counter);
    }
}
