use rand::RngCore;

use crate::core::{Individual, MoError};
use crate::operators::{Crossover, Mutation};

/// A trait to implement a variation operator that builds a set of offsprings from a mating pool
/// of parents.
pub trait Variation {
    /// The number of parents the operator needs in the mating pool to generate the offsprings.
    ///
    /// return: `usize`
    fn mating_pool_size(&self) -> usize;

    /// The number of offsprings the operator generates at each call.
    ///
    /// return: `usize`
    fn offspring_size(&self) -> usize;

    /// Generate the offsprings from the mating pool.
    ///
    /// # Arguments
    ///
    /// * `mating_pool`: The parents selected for reproduction.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Vec<Individual>, MoError>`
    fn evolve(
        &self,
        mating_pool: &[Individual],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, MoError>;
}

/// A variation operator that pairs consecutive parents in the mating pool, recombines each pair
/// with a crossover operator and then mutates every generated child.
pub struct CrossoverAndMutation {
    /// The number of offsprings to generate.
    offspring_size: usize,
    /// The operator to recombine a pair of parents.
    crossover: Box<dyn Crossover>,
    /// The operator to mutate the generated children.
    mutation: Box<dyn Mutation>,
}

impl CrossoverAndMutation {
    /// Create the variation operator. This returns an error if `offspring_size` is zero or odd,
    /// since the crossover always generates children in pairs.
    ///
    /// # Arguments
    ///
    /// * `offspring_size`: The number of offsprings to generate at each call.
    /// * `crossover`: The crossover operator.
    /// * `mutation`: The mutation operator.
    ///
    /// returns: `Result<CrossoverAndMutation, MoError>`
    pub fn new(
        offspring_size: usize,
        crossover: Box<dyn Crossover>,
        mutation: Box<dyn Mutation>,
    ) -> Result<Self, MoError> {
        if offspring_size == 0 || offspring_size % 2 != 0 {
            return Err(MoError::Configuration(
                "CrossoverAndMutation".to_string(),
                format!("the offspring size ({offspring_size}) must be an even positive number"),
            ));
        }
        Ok(Self {
            offspring_size,
            crossover,
            mutation,
        })
    }
}

impl Variation for CrossoverAndMutation {
    fn mating_pool_size(&self) -> usize {
        self.offspring_size
    }

    fn offspring_size(&self) -> usize {
        self.offspring_size
    }

    fn evolve(
        &self,
        mating_pool: &[Individual],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, MoError> {
        if mating_pool.len() != self.mating_pool_size() {
            return Err(MoError::DimensionMismatch(
                "mating pool".to_string(),
                mating_pool.len(),
                self.mating_pool_size(),
            ));
        }

        let mut offsprings: Vec<Individual> = Vec::with_capacity(self.offspring_size);
        for parents in mating_pool.chunks_exact(2) {
            let children = self
                .crossover
                .generate_offsprings(&parents[0], &parents[1], rng)?;
            offsprings.push(self.mutation.mutate_offspring(&children.child1, rng)?);
            offsprings.push(self.mutation.mutate_offspring(&children.child2, rng)?);
        }

        Ok(offsprings)
    }
}
