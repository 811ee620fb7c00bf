use std::marker::PhantomData;

use rand::prelude::SliceRandom;
use rand::RngCore;

use crate::core::{Individual, MoError};
use crate::operators::{BinaryComparisonOperator, PreferredSolution};

/// A trait implementing methods to choose individuals from a population for reproduction.
pub trait Selector {
    /// Select a number of individuals from the population equal to `number_of_winners`.
    ///
    /// # Arguments
    ///
    /// * `individuals`: The individuals.
    /// * `number_of_winners`: The number of winners to select.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Vec<Individual>, MoError>`
    fn select(
        &self,
        individuals: &[Individual],
        number_of_winners: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, MoError> {
        let mut winners: Vec<Individual> = Vec::new();
        for _ in 0..number_of_winners {
            winners.push(self.select_fit_individual(individuals, rng)?);
        }
        Ok(winners)
    }

    /// Select the fittest individual from the population.
    ///
    /// # Arguments
    ///
    /// * `individuals`: The list of individuals.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Individual, MoError>`
    fn select_fit_individual(
        &self,
        individuals: &[Individual],
        rng: &mut dyn RngCore,
    ) -> Result<Individual, MoError>;
}

/// Tournament selection method between multiple competitors for choosing individuals from a
/// population for reproduction. `number_of_competitors` individuals are randomly selected from the
/// population, then the most fit becomes a parent based on the provided comparison `Operator`.
/// More tournaments may be run to select more individuals.
pub struct TournamentSelector<Operator: BinaryComparisonOperator> {
    /// The number of competitors in each tournament. For example, 2 to run a binary tournament.
    number_of_competitors: usize,
    /// The operator to use to assess the fitness and determine which individual wins a tournament.
    _fitness_function: PhantomData<Operator>,
}

impl<Operator: BinaryComparisonOperator> TournamentSelector<Operator> {
    /// Create a new tournament.
    ///
    /// # Arguments
    ///
    /// * `number_of_competitors`: The number of competitors in the tournament. Default to 2
    ///   individuals.
    ///
    /// returns: `TournamentSelector`
    pub fn new(number_of_competitors: usize) -> Self {
        Self {
            _fitness_function: PhantomData::<Operator>,
            number_of_competitors,
        }
    }
}

impl<Operator: BinaryComparisonOperator> Selector for TournamentSelector<Operator> {
    /// Select the fittest individual from the population.
    ///
    /// # Arguments
    ///
    /// * `individuals`: The individuals with the solutions.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Individual, MoError>`
    fn select_fit_individual(
        &self,
        individuals: &[Individual],
        rng: &mut dyn RngCore,
    ) -> Result<Individual, MoError> {
        if individuals.is_empty() {
            return Err(MoError::SelectorOperator(
                "TournamentSelector".to_string(),
                "The population is empty and no individual can be selected".to_string(),
            ));
        }
        if individuals.len() < self.number_of_competitors {
            return Err(MoError::SelectorOperator(
                "TournamentSelector".to_string(),
                format!("The population size ({}) is smaller than the number of competitors needed in the tournament ({})", individuals.len(), self.number_of_competitors))
            );
        }
        let mut winner = individuals.choose(rng).unwrap();

        for _ in 0..self.number_of_competitors {
            let potential_winner = individuals.choose(rng).unwrap();
            let preferred_sol = Operator::compare(winner, potential_winner)?;
            if preferred_sol == PreferredSolution::Second {
                winner = potential_winner;
            } else if preferred_sol == PreferredSolution::MutuallyPreferred {
                // randomly select winner
                winner = [winner, potential_winner].choose(rng).unwrap();
            }
        }

        Ok(winner.clone())
    }
}

#[cfg(test)]
mod test {
    use crate::core::utils::get_rng;
    use crate::core::utils::test_utils::individuals_from_obj_values;
    use crate::operators::{ParetoConstrainedDominance, Selector, TournamentSelector};

    #[test]
    /// An empty population or one smaller than the tournament size cannot be used.
    fn test_wrong_population_size() {
        let selector = TournamentSelector::<ParetoConstrainedDominance>::new(2);
        let mut rng = get_rng(Some(1));
        assert!(selector.select_fit_individual(&[], &mut rng).is_err());

        let individuals = individuals_from_obj_values(&[[0.0, 0.0]]);
        assert!(selector
            .select_fit_individual(&individuals, &mut rng)
            .is_err());
    }

    #[test]
    /// The dominating individual wins the large majority of the tournaments. The dominated one
    /// can only win when it is drawn for every slot of a tournament.
    fn test_dominating_individual_wins() {
        let individuals = individuals_from_obj_values(&[[0.0, 0.0], [10.0, 10.0]]);
        let selector = TournamentSelector::<ParetoConstrainedDominance>::new(2);
        let mut rng = get_rng(Some(1));

        let mut dominating_wins = 0;
        for _ in 0..100 {
            let winner = selector
                .select_fit_individual(&individuals, &mut rng)
                .unwrap();
            if winner.objective_values() == [0.0, 0.0] {
                dominating_wins += 1;
            }
        }
        assert!(dominating_wins > 70);
    }

    #[test]
    /// Selecting several winners returns the requested number of individuals.
    fn test_select_many() {
        let individuals = individuals_from_obj_values(&[[0.0, 1.0], [1.0, 0.0], [0.5, 0.5]]);
        let selector = TournamentSelector::<ParetoConstrainedDominance>::new(2);
        let mut rng = get_rng(Some(2));
        let winners = selector.select(&individuals, 6, &mut rng).unwrap();
        assert_eq!(winners.len(), 6);
    }
}
