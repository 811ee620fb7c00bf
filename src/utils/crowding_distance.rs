use crate::core::{Individual, MoError};
use crate::utils::{argsort, vector_max, vector_min, Sort};

/// Calculate the crowding distance (with complexity $O(M * N * log(N))$, where `M` is the number
/// of objectives and `N` the number of individuals). This sets the distance on the individuals;
/// to retrieve it, use [`Individual::crowding_distance`].
/// > NOTE: the individuals must be a non-dominated front.
///
/// Boundary points on any objective get an infinite distance which is never overwritten by the
/// contributions of the other objectives. When all individuals share the same value on one
/// objective, that objective adds no contribution and designates no boundary points.
///
/// Implemented based on paragraph 3B in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// # Arguments
///
/// * `individuals`: The individuals in a non-dominated front.
///
/// returns: `Result<(), MoError>`
pub fn set_crowding_distance(individuals: &mut [Individual]) -> Result<(), MoError> {
    let total_individuals = individuals.len();

    // with up to 2 points all individuals are boundary points
    if total_individuals < 3 {
        for individual in individuals {
            individual.set_crowding_distance(f64::INFINITY);
        }
        return Ok(());
    }

    let mut distances = vec![0.0; total_individuals];

    let number_of_objectives = individuals[0].problem().number_of_objectives();
    for obj_index in 0..number_of_objectives {
        let mut obj_values: Vec<f64> = individuals
            .iter()
            .map(|i| i.get_objective_value(obj_index))
            .collect::<Result<_, _>>()?;
        let delta_range = vector_max(&obj_values)? - vector_min(&obj_values)?;

        // all values collapse onto one point, the objective carries no density information
        if delta_range.abs() < f64::EPSILON {
            continue;
        }

        // sort objectives and get indexes to map individuals to sorted objectives
        let sorted_idx = argsort(&obj_values, Sort::Ascending);
        obj_values.sort_by(|a, b| a.total_cmp(b));

        // assign infinite distance to the boundary points
        distances[sorted_idx[0]] = f64::INFINITY;
        distances[sorted_idx[total_individuals - 1]] = f64::INFINITY;

        for obj_i in 1..(total_individuals - 1) {
            // get corresponding individual to sorted objective
            let ind_i = sorted_idx[obj_i];
            let delta = (obj_values[obj_i + 1] - obj_values[obj_i - 1]) / delta_range;
            if delta.is_nan() {
                return Err(MoError::NaN(format!(
                    "the crowding distance increment for objective #{obj_index}"
                )));
            }
            distances[ind_i] += delta;
        }
    }

    for (individual, distance) in individuals.iter_mut().zip(distances) {
        individual.set_crowding_distance(distance);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::core::utils::test_utils::individuals_from_obj_values;
    use crate::utils::set_crowding_distance;

    #[test]
    /// Test the crowding distance algorithm (not enough points).
    fn test_crowding_distance_2_points() {
        let objectives = [[0.0, 0.0], [50.0, 50.0]];
        let mut individuals = individuals_from_obj_values(&objectives);
        set_crowding_distance(&mut individuals).unwrap();
        for i in individuals {
            assert_eq!(i.crowding_distance().unwrap(), f64::INFINITY);
        }
    }

    #[test]
    /// Test the crowding distance algorithm (3 points).
    fn test_crowding_distance_3_points() {
        let scenarios = [
            vec![[0.0, 0.0], [-100.0, 100.0], [200.0, -200.0]],
            vec![[25.0, 25.0], [-100.0, 100.0], [200.0, -200.0]],
        ];
        for objectives in scenarios {
            let mut individuals = individuals_from_obj_values(&objectives);
            set_crowding_distance(&mut individuals).unwrap();

            assert_eq!(individuals[0].crowding_distance().unwrap(), 2.0);
            // boundaries
            assert_eq!(individuals[1].crowding_distance().unwrap(), f64::INFINITY);
            assert_eq!(individuals[2].crowding_distance().unwrap(), f64::INFINITY);
        }
    }

    #[test]
    /// Test the crowding distance algorithm (3 objectives).
    fn test_crowding_distance_3_obj() {
        let objectives = [[0.0, 0.0, 0.0], [-1.0, 1.0, 2.0], [2.0, -2.0, -2.0]];
        let mut individuals = individuals_from_obj_values(&objectives);
        set_crowding_distance(&mut individuals).unwrap();

        assert_eq!(individuals[0].crowding_distance().unwrap(), 3.0);
        assert_eq!(individuals[1].crowding_distance().unwrap(), f64::INFINITY);
        assert_eq!(individuals[2].crowding_distance().unwrap(), f64::INFINITY);
    }

    #[test]
    /// Test the crowding distance algorithm (4 points).
    fn test_crowding_distance_4_points() {
        let objectives = [
            [0.0, 0.0],
            [100.0, -100.0],
            [200.0, -200.0],
            [400.0, -400.0],
        ];
        let mut individuals = individuals_from_obj_values(&objectives);
        set_crowding_distance(&mut individuals).unwrap();

        assert_eq!(individuals[0].crowding_distance().unwrap(), f64::INFINITY);
        assert_eq!(individuals[1].crowding_distance().unwrap(), 1.0);
        assert_eq!(individuals[2].crowding_distance().unwrap(), 1.5);
        assert_eq!(individuals[3].crowding_distance().unwrap(), f64::INFINITY);
    }

    #[test]
    /// Test the crowding distance algorithm (6 points).
    fn test_crowding_distance_6_points() {
        let objectives = [
            [1.1, 8.1],
            [2.1, 6.1],
            [3.1, 4.1],
            [5.1, 3.1],
            [8.1, 2.1],
            [11.1, 1.1],
        ];
        let mut individuals = individuals_from_obj_values(&objectives);
        set_crowding_distance(&mut individuals).unwrap();

        let expected = [
            f64::INFINITY,
            0.7714285714285714,
            0.728571429,
            0.785714286,
            0.885714286,
            f64::INFINITY,
        ];
        for (idx, value) in expected.into_iter().enumerate() {
            assert_approx_eq!(
                f64,
                individuals[idx].crowding_distance().unwrap(),
                value,
                epsilon = 0.001
            );
        }
    }

    #[test]
    /// An objective where all individuals share the same value adds no contribution and no
    /// boundary points.
    fn test_crowding_distance_degenerate_objective() {
        let objectives = [[5.0, 0.0], [5.0, 100.0], [5.0, 200.0], [5.0, 400.0]];
        let mut individuals = individuals_from_obj_values(&objectives);
        set_crowding_distance(&mut individuals).unwrap();

        // only the second objective contributes
        assert_eq!(individuals[0].crowding_distance().unwrap(), f64::INFINITY);
        assert_eq!(individuals[1].crowding_distance().unwrap(), 0.5);
        assert_eq!(individuals[2].crowding_distance().unwrap(), 0.75);
        assert_eq!(individuals[3].crowding_distance().unwrap(), f64::INFINITY);
    }
}
