use log::debug;

use crate::core::{Individual, MoError};
use crate::operators::{BinaryComparisonOperator, ParetoConstrainedDominance, PreferredSolution};
use crate::utils::set_crowding_distance;

/// A trait to implement an external archive collecting the non-dominated solutions found during
/// an optimisation run.
pub trait Archive {
    /// Offer a candidate solution to the archive. The candidate is rejected when an existing
    /// member dominates it; when it is accepted, all the members it dominates are removed and a
    /// copy of the candidate is stored. Members with the same objective vector are mutually
    /// non-dominated and are all kept.
    ///
    /// # Arguments
    ///
    /// * `individual`: The candidate solution.
    ///
    /// returns: `Result<bool, MoError>`. Whether the candidate was accepted.
    fn add(&mut self, individual: &Individual) -> Result<bool, MoError>;

    /// Get the archive members.
    ///
    /// return: `&[Individual]`
    fn individuals(&self) -> &[Individual];

    /// The number of members in the archive.
    ///
    /// return: `usize`
    fn len(&self) -> usize {
        self.individuals().len()
    }

    /// Whether the archive is empty.
    ///
    /// return: `bool`
    fn is_empty(&self) -> bool {
        self.individuals().is_empty()
    }
}

/// Check the candidate against the members and update the member list. This returns `false` and
/// leaves the archive untouched when an existing member dominates the candidate; otherwise it
/// removes the members dominated by the candidate and appends a copy of the candidate.
fn filter_and_insert(
    members: &mut Vec<Individual>,
    individual: &Individual,
    number_of_objectives: usize,
) -> Result<bool, MoError> {
    let candidate_size = individual.objective_values().len();
    if candidate_size != number_of_objectives {
        return Err(MoError::DimensionMismatch(
            "archive candidate objectives".to_string(),
            number_of_objectives,
            candidate_size,
        ));
    }
    if !individual.is_evaluated() {
        return Err(MoError::InvalidInput(
            "an unevaluated individual cannot be added to the archive".to_string(),
        ));
    }

    let mut dominated_members: Vec<usize> = Vec::new();
    for (index, member) in members.iter().enumerate() {
        match ParetoConstrainedDominance::compare(member, individual)? {
            PreferredSolution::First => return Ok(false),
            PreferredSolution::Second => dominated_members.push(index),
            PreferredSolution::MutuallyPreferred => {}
        }
    }

    // remove from the last index to keep the earlier ones valid
    for index in dominated_members.into_iter().rev() {
        members.remove(index);
    }
    members.push(individual.clone());
    Ok(true)
}

/// An archive with no size limit storing all the mutually non-dominated solutions it was offered.
pub struct UnboundedArchive {
    /// The archive members, in insertion order.
    members: Vec<Individual>,
    /// The number of objectives of the solutions the archive accepts.
    number_of_objectives: usize,
}

impl UnboundedArchive {
    /// Create a new empty archive.
    ///
    /// # Arguments
    ///
    /// * `number_of_objectives`: The number of objectives of the solutions the archive accepts.
    ///
    /// returns: `UnboundedArchive`
    pub fn new(number_of_objectives: usize) -> Self {
        Self {
            members: Vec::new(),
            number_of_objectives,
        }
    }
}

impl Archive for UnboundedArchive {
    fn add(&mut self, individual: &Individual) -> Result<bool, MoError> {
        filter_and_insert(&mut self.members, individual, self.number_of_objectives)
    }

    fn individuals(&self) -> &[Individual] {
        &self.members
    }
}

/// A bounded archive using the crowding distance to decide which member to drop when the
/// capacity is exceeded. After a successful insertion past capacity, the crowding distance is
/// recomputed over the whole archive treated as one front and the member with the smallest
/// distance is removed; ties are broken by evicting the earliest inserted member.
pub struct CrowdingDistanceArchive {
    /// The archive members, in insertion order.
    members: Vec<Individual>,
    /// The maximum number of members the archive holds.
    capacity: usize,
    /// The number of objectives of the solutions the archive accepts.
    number_of_objectives: usize,
}

impl CrowdingDistanceArchive {
    /// Create a new empty archive. This returns an error if the capacity is zero.
    ///
    /// # Arguments
    ///
    /// * `capacity`: The maximum number of members the archive holds.
    /// * `number_of_objectives`: The number of objectives of the solutions the archive accepts.
    ///
    /// returns: `Result<CrowdingDistanceArchive, MoError>`
    pub fn new(capacity: usize, number_of_objectives: usize) -> Result<Self, MoError> {
        if capacity == 0 {
            return Err(MoError::Configuration(
                "CrowdingDistanceArchive".to_string(),
                "the capacity must be a positive number".to_string(),
            ));
        }
        Ok(Self {
            members: Vec::new(),
            capacity,
            number_of_objectives,
        })
    }

    /// The maximum number of members the archive holds.
    ///
    /// return: `usize`
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove the member with the smallest crowding distance. On ties the earliest inserted
    /// member is evicted.
    fn prune(&mut self) -> Result<(), MoError> {
        set_crowding_distance(&mut self.members)?;

        let mut smallest_index = 0;
        let mut smallest_distance = f64::INFINITY;
        for (index, member) in self.members.iter().enumerate() {
            let distance = member.crowding_distance().ok_or(MoError::Generic(
                "an archive member has no crowding distance".to_string(),
            ))?;
            if distance < smallest_distance {
                smallest_distance = distance;
                smallest_index = index;
            }
        }

        debug!(
            "Removing the archive member #{} with distance {}",
            smallest_index, smallest_distance
        );
        self.members.remove(smallest_index);
        Ok(())
    }
}

impl Archive for CrowdingDistanceArchive {
    fn add(&mut self, individual: &Individual) -> Result<bool, MoError> {
        let added = filter_and_insert(&mut self.members, individual, self.number_of_objectives)?;
        if added && self.members.len() > self.capacity {
            self.prune()?;
        }
        Ok(added)
    }

    fn individuals(&self) -> &[Individual] {
        &self.members
    }
}

#[cfg(test)]
mod test {
    use crate::archive::{Archive, CrowdingDistanceArchive, UnboundedArchive};
    use crate::core::utils::test_utils::individuals_from_obj_values;

    #[test]
    /// A dominated candidate is rejected and a dominating one removes the dominated members.
    fn test_dominance_filter() {
        let individuals =
            individuals_from_obj_values(&[[1.0, 1.0], [2.0, 2.0], [0.0, 0.0], [0.0, 1.0]]);
        let mut archive = UnboundedArchive::new(2);

        assert!(archive.add(&individuals[0]).unwrap());
        // dominated by the first member
        assert!(!archive.add(&individuals[1]).unwrap());
        assert_eq!(archive.len(), 1);

        // dominates the first member
        assert!(archive.add(&individuals[2]).unwrap());
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.individuals()[0].objective_values(), &[0.0, 0.0]);

        // dominated by (0, 0)
        assert!(!archive.add(&individuals[3]).unwrap());
        assert_eq!(archive.len(), 1);
    }

    #[test]
    /// Members with equal objective vectors are mutually non-dominated and are all kept.
    fn test_duplicates_are_kept() {
        let individuals = individuals_from_obj_values(&[[1.0, 1.0], [1.0, 1.0]]);
        let mut archive = UnboundedArchive::new(2);
        assert!(archive.add(&individuals[0]).unwrap());
        assert!(archive.add(&individuals[1]).unwrap());
        assert_eq!(archive.len(), 2);
    }

    #[test]
    /// The capacity must be a positive number.
    fn test_zero_capacity() {
        assert!(CrowdingDistanceArchive::new(0, 2).is_err());
    }

    #[test]
    /// With capacity 1 and two mutually non-dominated candidates the archive keeps one member,
    /// whatever the insertion order. Both members are boundary points, so the earliest inserted
    /// is evicted.
    fn test_capacity_one() {
        let individuals = individuals_from_obj_values(&[[0.0, 1.0], [1.0, 0.0]]);

        for (first, second) in [(0, 1), (1, 0)] {
            let mut archive = CrowdingDistanceArchive::new(1, 2).unwrap();
            assert!(archive.add(&individuals[first]).unwrap());
            assert!(archive.add(&individuals[second]).unwrap());
            assert_eq!(archive.len(), 1);
            assert_eq!(
                archive.individuals()[0].objective_values(),
                individuals[second].objective_values()
            );
        }
    }

    #[test]
    /// With capacity 1 the dominance filter still applies: a dominated candidate is rejected and
    /// a dominating one replaces the member, whatever the insertion order.
    fn test_capacity_one_with_dominance() {
        let individuals = individuals_from_obj_values(&[[0.0, 0.0], [1.0, 1.0]]);

        // the dominated candidate is rejected without pruning
        let mut archive = CrowdingDistanceArchive::new(1, 2).unwrap();
        assert!(archive.add(&individuals[0]).unwrap());
        assert!(!archive.add(&individuals[1]).unwrap());
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.individuals()[0].objective_values(), &[0.0, 0.0]);

        // the dominating candidate removes the member it dominates
        let mut archive = CrowdingDistanceArchive::new(1, 2).unwrap();
        assert!(archive.add(&individuals[1]).unwrap());
        assert!(archive.add(&individuals[0]).unwrap());
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.individuals()[0].objective_values(), &[0.0, 0.0]);
    }

    #[test]
    /// The archive never exceeds its capacity and the least crowded member survives the pruning.
    fn test_capacity_invariant() {
        let individuals = individuals_from_obj_values(&[
            [0.0, 5.0],
            [5.0, 0.0],
            [1.0, 4.0],
            [1.1, 3.9],
            [3.0, 2.0],
        ]);
        let mut archive = CrowdingDistanceArchive::new(4, 2).unwrap();
        for individual in &individuals {
            archive.add(individual).unwrap();
            assert!(archive.len() <= 4);
        }
        assert_eq!(archive.len(), 4);

        // the points in the most crowded region are (1, 4) and (1.1, 3.9); one of them must have
        // been evicted while the boundary points survive
        let values: Vec<Vec<f64>> = archive
            .individuals()
            .iter()
            .map(|i| i.objective_values().to_vec())
            .collect();
        assert!(values.contains(&vec![0.0, 5.0]));
        assert!(values.contains(&vec![5.0, 0.0]));
        assert!(values.contains(&vec![3.0, 2.0]));
    }
}
