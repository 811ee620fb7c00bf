//! A component-based framework to solve multi-objective optimisation problems with
//! meta-heuristic algorithms.
//!
//! The building blocks (Pareto dominance comparison, fast non-dominated sorting, crowding
//! distance, bounded archives, selection, variation and replacement operators) are exposed as
//! traits and free functions, and two ready-made loops assemble them: a generic
//! [`algorithms::EvolutionaryAlgorithm`] (NSGA-II when configured with the crowded-comparison
//! tournament, SBX, polynomial mutation and the ranking-and-crowding replacement) and the
//! [`algorithms::ParticleSwarmOptimization`] SMPSO optimiser.
//!
//! Define a problem with its objectives, bounded variables, optional constraints and an
//! [`core::Evaluator`], pick the components and a stopping condition, then call
//! [`algorithms::Algorithm::run`]. Results can be exported to JSON or CSV.
pub mod algorithms;
pub mod archive;
pub mod core;
pub mod observer;
pub mod operators;
pub mod utils;
