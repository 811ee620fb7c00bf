use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by the library.
pub enum MoError {
    #[error("The following error occurred: {0}")]
    Generic(String),
    #[error("You must provide at least one objective to properly define a problem")]
    NoObjective,
    #[error("You must provide at least one variable to properly define a problem")]
    NoVariables,
    #[error("The {0} named '{1}' already exists")]
    DuplicatedName(String, String),
    #[error("The {0} index {1} does not exist")]
    NonExistingIndex(String, usize),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Wrong number of {0}: expected {1} but {2} given")]
    DimensionMismatch(String, usize, usize),
    #[error("Invalid configuration of '{0}': {1}")]
    Configuration(String, String),
    #[error("An error occurred in the comparison operator '{0}': {1}")]
    ComparisonOperator(String, String),
    #[error("An error occurred in the selector operator '{0}': {1}")]
    SelectorOperator(String, String),
    #[error("An error occurred in the crossover operator '{0}': {1}")]
    CrossoverOperator(String, String),
    #[error("An error occurred in the mutation operator '{0}': {1}")]
    MutationOperator(String, String),
    #[error("An error occurred in the survival operator '{0}': {1}")]
    SurvivalOperator(String, String),
    #[error("An error occurred when evaluating a solution: {0}")]
    Evaluation(String),
    #[error("An error occurred when initialising {0}: {1}")]
    AlgorithmInit(String, String),
    #[error("An error occurred when exporting the algorithm data: {0}")]
    AlgorithmExport(String),
    #[error("NaN detected when setting the {0}. This may be an error in the user-defined evaluation function")]
    NaN(String),
}
