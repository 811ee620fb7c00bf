use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The algorithm progress data polled by the stopping conditions once per iteration.
pub struct ProgressContext {
    /// The generation or iteration number.
    pub generation: usize,
    /// The number of function evaluations run so far.
    pub number_of_function_evaluations: usize,
    /// The time elapsed since the start of the run.
    pub elapsed: Duration,
}

/// Trait to define a condition that causes an algorithm to terminate.
pub trait StoppingCondition<T: PartialOrd> {
    /// The target value of the stopping condition.
    fn target(&self) -> T;

    /// Whether the stopping condition is met.
    fn is_met(&self, current: T) -> bool {
        self.target() <= current
    }

    /// A name describing the stopping condition.
    fn name() -> String;
}

/// Number of generations after which an algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MaxGenerationValue(pub usize);

impl StoppingCondition<usize> for MaxGenerationValue {
    fn target(&self) -> usize {
        self.0
    }

    fn name() -> String {
        "maximum number of generations".to_string()
    }
}

/// Number of function evaluations after which an algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MaxFunctionEvaluationValue(pub usize);

impl StoppingCondition<usize> for MaxFunctionEvaluationValue {
    fn target(&self) -> usize {
        self.0
    }

    fn name() -> String {
        "maximum number of function evaluations".to_string()
    }
}

/// Elapsed time after which an algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MaxDurationValue(pub Duration);

impl StoppingCondition<Duration> for MaxDurationValue {
    fn target(&self) -> Duration {
        self.0
    }

    fn name() -> String {
        "maximum duration".to_string()
    }
}

/// The type of stopping condition. Pick one type to inform the algorithm how/when it should
/// terminate the evolution.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum StoppingConditionType {
    /// Set a maximum duration
    MaxDuration(MaxDurationValue),
    /// Set a maximum number of generations
    MaxGeneration(MaxGenerationValue),
    /// Set a maximum number of function evaluations
    MaxFunctionEvaluations(MaxFunctionEvaluationValue),
    /// Stop when at least one condition is met
    Any(Vec<StoppingConditionType>),
    /// Stop when all conditions are met
    All(Vec<StoppingConditionType>),
}

impl StoppingConditionType {
    /// Whether the condition is met for the given algorithm progress.
    ///
    /// # Arguments
    ///
    /// * `progress`: The algorithm progress data.
    ///
    /// returns: `bool`
    pub fn is_met(&self, progress: &ProgressContext) -> bool {
        match self {
            StoppingConditionType::MaxDuration(t) => t.is_met(progress.elapsed),
            StoppingConditionType::MaxGeneration(t) => t.is_met(progress.generation),
            StoppingConditionType::MaxFunctionEvaluations(t) => {
                t.is_met(progress.number_of_function_evaluations)
            }
            StoppingConditionType::Any(conditions) => {
                conditions.iter().any(|c| c.is_met(progress))
            }
            StoppingConditionType::All(conditions) => {
                conditions.iter().all(|c| c.is_met(progress))
            }
        }
    }

    /// A name describing the stopping condition.
    ///
    /// returns: `String`
    pub fn name(&self) -> String {
        match self {
            StoppingConditionType::MaxDuration(_) => MaxDurationValue::name(),
            StoppingConditionType::MaxGeneration(_) => MaxGenerationValue::name(),
            StoppingConditionType::MaxFunctionEvaluations(_) => MaxFunctionEvaluationValue::name(),
            StoppingConditionType::Any(s) => s
                .iter()
                .map(|cond| cond.name())
                .collect::<Vec<String>>()
                .join(" OR "),
            StoppingConditionType::All(s) => s
                .iter()
                .map(|cond| cond.name())
                .collect::<Vec<String>>()
                .join(" AND "),
        }
    }
}
