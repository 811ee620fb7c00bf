pub use constraint::Constraint;
pub use error::MoError;
pub use individual::{Individual, IndividualExport, Population};
pub use objective::{Objective, ObjectiveDirection};
pub use problem::{builtin_problems, EvaluationResult, Evaluator, Problem, ProblemExport};
pub use variable::BoundedNumber;

mod constraint;
mod error;
mod individual;
mod objective;
mod problem;
pub mod utils;
mod variable;
