pub use algorithm::{Algorithm, AlgorithmExport, AlgorithmSerialisedExport, Elapsed};
pub use evolutionary::{EvolutionaryAlgorithm, EvolutionaryAlgorithmArg};
pub use pso::{InertiaWeightStrategy, ParticleSwarmOptimization, ParticleSwarmOptimizationArg};
pub use stopping_condition::{
    MaxDurationValue, MaxFunctionEvaluationValue, MaxGenerationValue, ProgressContext,
    StoppingCondition, StoppingConditionType,
};

mod algorithm;
mod evolutionary;
mod pso;
mod stopping_condition;
