pub use comparison::{
    BinaryComparisonOperator, CrowdedComparison, ParetoConstrainedDominance, PreferredSolution,
};
pub use crossover::{Crossover, CrossoverChildren, SimulatedBinaryCrossover, SimulatedBinaryCrossoverArgs};
pub use mutation::{Mutation, PolynomialMutation, PolynomialMutationArgs};
pub use replacement::{RankingAndCrowdingReplacement, Replacement};
pub use selector::{Selector, TournamentSelector};
pub use variation::{CrossoverAndMutation, Variation};

mod comparison;
mod crossover;
mod mutation;
mod replacement;
mod selector;
mod variation;
