use log::debug;

use crate::core::{Individual, MoError};
use crate::utils::{argsort, fast_non_dominated_sort, set_crowding_distance, Sort};

/// A trait to implement a replacement operator that selects the individuals surviving to the next
/// generation from the merged set of parents and offsprings.
pub trait Replacement {
    /// Select the survivors. The returned vector always contains as many individuals as the
    /// parent population.
    ///
    /// # Arguments
    ///
    /// * `parents`: The parent population.
    /// * `offsprings`: The offsprings generated in the current iteration.
    ///
    /// returns: `Result<Vec<Individual>, MoError>`
    fn replace(
        &self,
        parents: &[Individual],
        offsprings: &[Individual],
    ) -> Result<Vec<Individual>, MoError>;
}

/// The elitist replacement from Deb et al. (2002). Parents and offsprings are merged and sorted
/// into non-dominated fronts; whole fronts are copied into the new population while they fit,
/// then the first front that does not fit is truncated by keeping its least crowded members.
pub struct RankingAndCrowdingReplacement;

impl Replacement for RankingAndCrowdingReplacement {
    fn replace(
        &self,
        parents: &[Individual],
        offsprings: &[Individual],
    ) -> Result<Vec<Individual>, MoError> {
        let population_size = parents.len();

        let mut merged: Vec<Individual> = Vec::with_capacity(parents.len() + offsprings.len());
        merged.extend(parents.iter().cloned());
        merged.extend(offsprings.iter().cloned());

        let mut sort_results = fast_non_dominated_sort(&mut merged)?;
        debug!(
            "Merged {} individuals into {} fronts",
            merged.len(),
            sort_results.fronts.len()
        );

        let mut survivors: Vec<Individual> = Vec::with_capacity(population_size);
        for (front_index, mut front) in sort_results.fronts.drain(..).enumerate() {
            set_crowding_distance(&mut front)?;

            if survivors.len() + front.len() <= population_size {
                // the whole front fits in the new population
                debug!("Adding front #{} (size {})", front_index, front.len());
                survivors.extend(front);
                if survivors.len() == population_size {
                    break;
                }
            } else {
                // truncate the boundary front keeping the least crowded individuals
                let remaining = population_size - survivors.len();
                debug!(
                    "Truncating front #{} to {} individuals",
                    front_index, remaining
                );
                let distances: Vec<f64> = front
                    .iter()
                    .map(|i| i.crowding_distance())
                    .collect::<Option<_>>()
                    .ok_or(MoError::SurvivalOperator(
                        "RankingAndCrowdingReplacement".to_string(),
                        "an individual in the boundary front has no crowding distance".to_string(),
                    ))?;
                for index in argsort(&distances, Sort::Descending).into_iter().take(remaining) {
                    survivors.push(front[index].clone());
                }
                break;
            }
        }

        Ok(survivors)
    }
}

#[cfg(test)]
mod test {
    use crate::core::utils::test_utils::individuals_from_obj_values;
    use crate::operators::{RankingAndCrowdingReplacement, Replacement};

    #[test]
    /// The survivors always match the parent population size.
    fn test_population_size_is_preserved() {
        let parents = individuals_from_obj_values(&[[0.0, 5.0], [1.0, 4.0], [2.0, 3.0], [9.0, 9.0]]);
        let offsprings = individuals_from_obj_values(&[[0.5, 4.5], [8.0, 8.0]]);

        let survivors = RankingAndCrowdingReplacement
            .replace(&parents, &offsprings)
            .unwrap();
        assert_eq!(survivors.len(), parents.len());
    }

    #[test]
    /// Lower-ranked fronts are always kept in full before any higher-ranked individual.
    fn test_rank_monotone_survivors() {
        // front 0: first three points; front 1: the dominated ones
        let parents = individuals_from_obj_values(&[[0.0, 5.0], [1.0, 4.0], [2.0, 3.0], [9.0, 9.0]]);
        let offsprings = individuals_from_obj_values(&[[10.0, 10.0], [11.0, 11.0]]);

        let survivors = RankingAndCrowdingReplacement
            .replace(&parents, &offsprings)
            .unwrap();

        let mut front0: Vec<Vec<f64>> = survivors
            .iter()
            .filter(|i| i.rank().unwrap() == 0)
            .map(|i| i.objective_values().to_vec())
            .collect();
        front0.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(front0, vec![vec![0.0, 5.0], vec![1.0, 4.0], vec![2.0, 3.0]]);

        // only one slot is left for the dominated front
        assert_eq!(
            survivors.iter().filter(|i| i.rank().unwrap() > 0).count(),
            1
        );
    }

    #[test]
    /// When the merged set is a single over-sized front, the truncation keeps the boundary
    /// points and the least crowded interior ones.
    fn test_single_front_truncation() {
        // 8 mutually non-dominated points on a line
        let parents = individuals_from_obj_values(&[
            [0.0, 7.0],
            [1.0, 6.0],
            [2.0, 5.0],
            [3.0, 4.0],
        ]);
        let offsprings = individuals_from_obj_values(&[
            [4.0, 3.0],
            [5.0, 2.0],
            [6.0, 1.0],
            [7.0, 0.0],
        ]);

        let survivors = RankingAndCrowdingReplacement
            .replace(&parents, &offsprings)
            .unwrap();
        assert_eq!(survivors.len(), 4);

        // the extremes have infinite crowding distance and always survive
        let values: Vec<f64> = survivors
            .iter()
            .map(|i| i.get_objective_value(0).unwrap())
            .collect();
        assert!(values.contains(&0.0));
        assert!(values.contains(&7.0));
        for individual in &survivors {
            assert_eq!(individual.rank().unwrap(), 0);
        }
    }
}
