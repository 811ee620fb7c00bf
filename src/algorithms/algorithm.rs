use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::algorithms::{ProgressContext, StoppingConditionType};
use crate::core::{Individual, IndividualExport, MoError, Population, Problem, ProblemExport};
use crate::observer::{IterationData, Observable};

#[derive(Serialize, Deserialize, Debug)]
/// The data with the elapsed time.
pub struct Elapsed {
    /// Elapsed hours.
    hours: u64,
    /// Elapsed minutes.
    minutes: u64,
    /// Elapsed seconds.
    seconds: u64,
}

#[derive(Serialize, Deserialize, Debug)]
/// The struct used to export an algorithm serialised data.
pub struct AlgorithmSerialisedExport<T: Serialize> {
    /// Specific options for an algorithm.
    pub options: T,
    /// The problem configuration.
    pub problem: ProblemExport,
    /// The individuals in the population.
    pub individuals: Vec<IndividualExport>,
    /// The generation the export was collected at.
    pub generation: usize,
    /// The number of function evaluations run to reach the `generation`.
    pub number_of_function_evaluations: usize,
    /// The algorithm name.
    pub algorithm: String,
    /// The UTC time the algorithm started at.
    pub started_at: DateTime<Utc>,
    /// The time took to reach the `generation`.
    pub took: Elapsed,
}

/// The struct used to export an algorithm data.
#[derive(Debug)]
pub struct AlgorithmExport {
    /// The problem.
    pub problem: Arc<Problem>,
    /// The individuals with the solutions, constraint and objective values at the current
    /// generation.
    pub individuals: Vec<Individual>,
    /// The generation number.
    pub generation: usize,
    /// The number of function evaluations.
    pub number_of_function_evaluations: usize,
    /// The algorithm name used to evolve the individuals.
    pub algorithm: String,
    /// The time the algorithm took to reach the current generation.
    pub took: Elapsed,
}

/// The trait to use to implement an algorithm.
pub trait Algorithm<AlgorithmOptions: Serialize + DeserializeOwned>: Display {
    /// Initialise the algorithm.
    ///
    /// return: `Result<(), MoError>`
    fn initialise(&mut self) -> Result<(), MoError>;

    /// Evolve the population by one iteration.
    ///
    /// return: `Result<(), MoError>`
    fn evolve(&mut self) -> Result<(), MoError>;

    /// Return the current step of the algorithm evolution.
    ///
    /// return: `usize`.
    fn generation(&self) -> usize;

    /// Return the number of function evaluations run so far.
    ///
    /// return: `usize`.
    fn number_of_function_evaluations(&self) -> usize;

    /// Return the algorithm name.
    ///
    /// return: `String`.
    fn name(&self) -> String;

    /// Get the time when the algorithm started.
    ///
    /// return: `&Instant`.
    fn start_time(&self) -> &Instant;

    /// Get the UTC time the algorithm started at.
    ///
    /// return: `DateTime<Utc>`.
    fn start_timestamp(&self) -> DateTime<Utc>;

    /// Return the stopping condition.
    ///
    /// return: `&StoppingConditionType`.
    fn stopping_condition(&self) -> &StoppingConditionType;

    /// Return the evolved population.
    ///
    /// return: `&Population`.
    fn population(&self) -> &Population;

    /// Return the problem.
    ///
    /// return: `Arc<Problem>`.
    fn problem(&self) -> Arc<Problem>;

    /// Return the registered observers.
    ///
    /// return: `&Observable`.
    fn observable(&self) -> &Observable;

    /// The algorithm options to include in the serialised export.
    ///
    /// return: `AlgorithmOptions`
    fn algorithm_options(&self) -> AlgorithmOptions;

    /// Get the elapsed hours, minutes and seconds since the start of the algorithm.
    ///
    /// return: `[u64; 3]`. An array with the number of elapsed hours, minutes and seconds.
    fn elapsed(&self) -> [u64; 3] {
        let duration = self.start_time().elapsed();
        let seconds = duration.as_secs() % 60;
        let minutes = (duration.as_secs() / 60) % 60;
        let hours = (duration.as_secs() / 60) / 60;
        [hours, minutes, seconds]
    }

    /// Format the elapsed time as string.
    ///
    /// return: `String`.
    fn elapsed_as_string(&self) -> String {
        let [hours, minutes, seconds] = self.elapsed();
        format!(
            "{:0>2} hours, {:0>2} minutes and {:0>2} seconds",
            hours, minutes, seconds
        )
    }

    /// Evaluate the objectives and constraints for the unevaluated individuals using threads.
    /// Each worker gets exclusive access to its individual; no other state is shared. This
    /// returns the number of evaluations that were run, or an error if the evaluation function
    /// fails or does not provide a value for all the problem constraints or objectives.
    ///
    /// # Arguments
    ///
    /// * `individuals`: The individuals to evaluate.
    ///
    /// return `Result<usize, MoError>`
    fn do_parallel_evaluation(individuals: &mut [Individual]) -> Result<usize, MoError> {
        let evaluated = individuals
            .into_par_iter()
            .enumerate()
            .map(|(idx, i)| Self::evaluate_individual(idx, i))
            .collect::<Result<Vec<bool>, MoError>>()?;
        Ok(evaluated.into_iter().filter(|e| *e).count())
    }

    /// Evaluate the objectives and constraints for the unevaluated individuals in a plain loop.
    /// This returns the number of evaluations that were run, or an error if the evaluation
    /// function fails or does not provide a value for all the problem constraints or objectives.
    /// Evaluation may be performed in threads using [`Self::do_parallel_evaluation`].
    ///
    /// # Arguments
    ///
    /// * `individuals`: The individuals to evaluate.
    ///
    /// return `Result<usize, MoError>`
    fn do_evaluation(individuals: &mut [Individual]) -> Result<usize, MoError> {
        let evaluated = individuals
            .iter_mut()
            .enumerate()
            .map(|(idx, i)| Self::evaluate_individual(idx, i))
            .collect::<Result<Vec<bool>, MoError>>()?;
        Ok(evaluated.into_iter().filter(|e| *e).count())
    }

    /// Evaluate the objectives and constraints for one individual. This returns whether the
    /// evaluation function was run (already-evaluated individuals are skipped), or an error if
    /// the evaluation function fails or returns the wrong number of objective or constraint
    /// values.
    ///
    /// # Arguments
    ///
    /// * `idx`: The individual index.
    /// * `individual`: The individual to evaluate.
    ///
    /// return `Result<bool, MoError>`
    fn evaluate_individual(idx: usize, i: &mut Individual) -> Result<bool, MoError> {
        debug!("Evaluating individual #{} - {:?}", idx + 1, i.variables());

        // skip evaluated solutions
        if i.is_evaluated() {
            debug!("Skipping evaluation for individual #{idx}. Already evaluated.");
            return Ok(false);
        }
        let problem = i.problem();
        let results = problem
            .evaluator()
            .evaluate(i)
            .map_err(|e| MoError::Evaluation(e.to_string()))?;

        // update the objectives and constraints for the individual
        debug!("Updating individual #{idx} objectives and constraints");
        if results.objectives.len() != problem.number_of_objectives() {
            return Err(MoError::Evaluation(format!(
                "The evaluation function returned {} objective values instead of {}",
                results.objectives.len(),
                problem.number_of_objectives()
            )));
        }
        for (obj_index, value) in results.objectives.iter().enumerate() {
            i.update_objective(obj_index, *value)?;
        }

        if let Some(constraints) = results.constraints {
            if constraints.len() != problem.number_of_constraints() {
                return Err(MoError::Evaluation(format!(
                    "The evaluation function returned {} constraint values instead of {}",
                    constraints.len(),
                    problem.number_of_constraints()
                )));
            }
            for (constraint_index, value) in constraints.iter().enumerate() {
                i.update_constraint(constraint_index, *value)?;
            }
        }
        i.set_evaluated();
        Ok(true)
    }

    /// Run the algorithm until the stopping condition is met. The observers are notified once at
    /// the end of each iteration.
    ///
    /// return: `Result<(), MoError>`
    fn run(&mut self) -> Result<(), MoError> {
        info!("Starting {}", self.name());
        self.initialise()?;

        loop {
            // Evolve population
            info!("Generation #{}", self.generation());
            self.evolve()?;
            info!(
                "Evolved generation #{} - Elapsed Time: {}",
                self.generation(),
                self.elapsed_as_string()
            );

            // Notify the observers
            let name = self.name();
            self.observable().notify(&IterationData {
                algorithm_name: &name,
                generation: self.generation(),
                number_of_function_evaluations: self.number_of_function_evaluations(),
                elapsed: self.start_time().elapsed(),
                individuals: self.population().individuals(),
            });

            // Termination
            let progress = ProgressContext {
                generation: self.generation(),
                number_of_function_evaluations: self.number_of_function_evaluations(),
                elapsed: self.start_time().elapsed(),
            };
            let cond = self.stopping_condition();
            if cond.is_met(&progress) {
                info!("Stopping evolution because the {} was reached", cond.name());
                info!("Took {}", self.elapsed_as_string());
                break;
            }
        }

        Ok(())
    }

    /// Get the results of the run.
    ///
    /// return: `AlgorithmExport`.
    fn get_results(&self) -> AlgorithmExport {
        let [hours, minutes, seconds] = self.elapsed();
        AlgorithmExport {
            problem: self.problem(),
            individuals: self.population().individuals().to_vec(),
            generation: self.generation(),
            number_of_function_evaluations: self.number_of_function_evaluations(),
            algorithm: self.name(),
            took: Elapsed {
                hours,
                minutes,
                seconds,
            },
        }
    }

    /// Save the algorithm data (individuals' objective, variables and constraints, the problem,
    /// ...) to a JSON file. This returns an error if the file cannot be saved.
    ///
    /// # Arguments
    ///
    /// * `destination`: The path to the folder where to save the JSON file.
    /// * `file_prefix`: A prefix to prepend at the beginning of the file name. Default to
    ///   `Result` when `None`.
    ///
    /// return `Result<(), MoError>`
    fn save_to_json(&self, destination: &PathBuf, file_prefix: Option<&str>) -> Result<(), MoError> {
        let file_prefix = file_prefix.unwrap_or("Result");

        let [hours, minutes, seconds] = self.elapsed();
        let export = AlgorithmSerialisedExport {
            options: self.algorithm_options(),
            problem: self.problem().serialise(),
            individuals: self.population().serialise(),
            generation: self.generation(),
            number_of_function_evaluations: self.number_of_function_evaluations(),
            algorithm: self.name(),
            started_at: self.start_timestamp(),
            took: Elapsed {
                hours,
                minutes,
                seconds,
            },
        };
        let data = serde_json::to_string_pretty(&export).map_err(|e| {
            MoError::AlgorithmExport(format!(
                "The following error occurred while converting the result struct: {e}"
            ))
        })?;

        let mut file = destination.to_owned();
        file.push(format!(
            "{}_{}_gen{}.json",
            file_prefix,
            self.name(),
            self.generation()
        ));

        info!("Saving JSON file {:?}", file);
        fs::write(file, data).map_err(|e| {
            MoError::AlgorithmExport(format!(
                "The following error occurred while exporting the JSON file: {e}",
            ))
        })?;
        Ok(())
    }
}
