use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::algorithms::{Algorithm, StoppingConditionType};
use crate::archive::{Archive, CrowdingDistanceArchive};
use crate::core::utils::get_rng;
use crate::core::{Individual, MoError, Population, Problem};
use crate::observer::Observable;
use crate::operators::{Replacement, Selector, Variation};
use crate::utils::{fast_non_dominated_sort, set_crowding_distance};

/// Input arguments for [`EvolutionaryAlgorithm`].
#[derive(Serialize, Deserialize, Clone)]
pub struct EvolutionaryAlgorithmArg {
    /// The algorithm name used in logs and exported files.
    pub name: String,
    /// The number of individuals to use in the population.
    pub number_of_individuals: usize,
    /// The capacity of the external crowding-distance archive. No archive is kept when `None`.
    pub archive_capacity: Option<usize>,
    /// Return the archive members instead of the final population as the algorithm result. This
    /// requires `archive_capacity`.
    pub archive_output: bool,
    /// The condition to use when to terminate the algorithm.
    pub stopping_condition: StoppingConditionType,
    /// Whether the objective and constraint evaluation in [`Problem::evaluator`] should run
    /// using threads. If the evaluation function takes a long time to run and return the updated
    /// values, it is advisable to set this to `true`. This defaults to `true`.
    pub parallel: Option<bool>,
    /// The seed used in the random number generator (RNG). You can specify a seed in case you
    /// want to try to reproduce results. The RNG is used to randomly initialise the population
    /// and by the operators. This defaults to a random seed.
    pub seed: Option<u64>,
}

/// A generic evolutionary algorithm assembled from injected components: a [`Selector`] building
/// the mating pool, a [`Variation`] generating the offsprings, a [`Replacement`] choosing the
/// survivors and an optional bounded archive collecting the non-dominated solutions found along
/// the way. With a binary tournament on the crowded comparison, SBX crossover, polynomial
/// mutation and the ranking-and-crowding replacement this reproduces NSGA-II from:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
pub struct EvolutionaryAlgorithm {
    /// The problem being solved.
    problem: Arc<Problem>,
    /// The population with the solutions.
    population: Population,
    /// The number of individuals in the population.
    number_of_individuals: usize,
    /// The operator to use to select the individuals for reproduction.
    selector: Box<dyn Selector>,
    /// The operator to use to generate the offsprings from the mating pool.
    variation: Box<dyn Variation>,
    /// The operator to use to select the survivors from parents and offsprings.
    replacement: Box<dyn Replacement>,
    /// The external archive with the non-dominated solutions found during the run.
    archive: Option<CrowdingDistanceArchive>,
    /// Whether the archive members are the algorithm result.
    archive_output: bool,
    /// The evolution step.
    generation: usize,
    /// The number of function evaluations.
    nfe: usize,
    /// The condition to use when to terminate the algorithm.
    stopping_condition: StoppingConditionType,
    /// The time when the algorithm started.
    start_time: Instant,
    /// The UTC time the algorithm started at.
    start_timestamp: DateTime<Utc>,
    /// Whether the evaluation should run using threads.
    parallel: bool,
    /// The registered observers.
    observable: Observable,
    /// The random number generator.
    rng: Box<dyn RngCore>,
    /// The options with which the algorithm was created.
    args: EvolutionaryAlgorithmArg,
}

impl EvolutionaryAlgorithm {
    /// Initialise the algorithm. This returns an error if the population has fewer than 2
    /// individuals, the variation mating pool is empty or larger than the population, or the
    /// archive options are inconsistent.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem being solved.
    /// * `options`: The [`EvolutionaryAlgorithmArg`] arguments to customise the algorithm
    ///   behaviour.
    /// * `selector`: The operator selecting the individuals for reproduction.
    /// * `variation`: The operator generating the offsprings.
    /// * `replacement`: The operator selecting the survivors.
    ///
    /// returns: `Result<EvolutionaryAlgorithm, MoError>`
    pub fn new(
        problem: Problem,
        options: EvolutionaryAlgorithmArg,
        selector: Box<dyn Selector>,
        variation: Box<dyn Variation>,
        replacement: Box<dyn Replacement>,
    ) -> Result<Self, MoError> {
        let name = options.name.clone();
        if options.number_of_individuals < 2 {
            return Err(MoError::AlgorithmInit(
                name,
                "The population size must have at least 2 individuals".to_string(),
            ));
        }
        let pool_size = variation.mating_pool_size();
        if pool_size == 0 || pool_size > options.number_of_individuals {
            return Err(MoError::AlgorithmInit(
                name,
                format!(
                    "The mating pool size ({}) must be between 1 and the population size ({})",
                    pool_size, options.number_of_individuals
                ),
            ));
        }
        if options.archive_output && options.archive_capacity.is_none() {
            return Err(MoError::AlgorithmInit(
                name,
                "The archive output was requested but no archive capacity was given".to_string(),
            ));
        }

        let problem = Arc::new(problem);
        let archive = match options.archive_capacity {
            Some(capacity) => Some(CrowdingDistanceArchive::new(
                capacity,
                problem.number_of_objectives(),
            )?),
            None => None,
        };

        let mut rng = get_rng(options.seed);
        info!("Created initial random population");
        let population = Population::init(problem.clone(), options.number_of_individuals, &mut rng);

        Ok(Self {
            problem,
            population,
            number_of_individuals: options.number_of_individuals,
            selector,
            variation,
            replacement,
            archive,
            archive_output: options.archive_output,
            generation: 0,
            nfe: 0,
            stopping_condition: options.stopping_condition.clone(),
            start_time: Instant::now(),
            start_timestamp: Utc::now(),
            parallel: options.parallel.unwrap_or(true),
            observable: Observable::new(),
            rng,
            args: options,
        })
    }

    /// Register a new observer notified at the end of each iteration.
    ///
    /// # Arguments
    ///
    /// * `observer`: The observer to register.
    pub fn add_observer(&mut self, observer: Box<dyn crate::observer::Observer>) {
        self.observable.register(observer);
    }

    /// Get the archive members, if an archive was configured.
    ///
    /// return: `Option<&[Individual]>`
    pub fn archive(&self) -> Option<&[Individual]> {
        self.archive.as_ref().map(|a| a.individuals())
    }

    /// Get the algorithm result: the archive members when the archive output was requested, the
    /// final population otherwise.
    ///
    /// return: `&[Individual]`
    pub fn result_individuals(&self) -> &[Individual] {
        match (&self.archive, self.archive_output) {
            (Some(archive), true) => archive.individuals(),
            _ => self.population.individuals(),
        }
    }

    /// Offer the evaluated individuals to the archive.
    fn update_archive(
        archive: &mut Option<CrowdingDistanceArchive>,
        individuals: &[Individual],
    ) -> Result<(), MoError> {
        if let Some(archive) = archive {
            for individual in individuals {
                archive.add(individual)?;
            }
        }
        Ok(())
    }
}

impl Display for EvolutionaryAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.args.name)
    }
}

impl Algorithm<EvolutionaryAlgorithmArg> for EvolutionaryAlgorithm {
    /// This assesses the initial random population and sets the individual's ranks and crowding
    /// distance needed by the selection in [`EvolutionaryAlgorithm::evolve`].
    ///
    /// return: `Result<(), MoError>`
    fn initialise(&mut self) -> Result<(), MoError> {
        info!("Evaluating initial population");
        self.nfe += if self.parallel {
            Self::do_parallel_evaluation(self.population.individuals_as_mut())?
        } else {
            Self::do_evaluation(self.population.individuals_as_mut())?
        };

        debug!("Calculating rank");
        fast_non_dominated_sort(self.population.individuals_as_mut())?;

        debug!("Calculating crowding distance");
        set_crowding_distance(self.population.individuals_as_mut())?;

        Self::update_archive(&mut self.archive, self.population.individuals())?;

        info!("Initial evaluation completed");
        self.generation += 1;

        Ok(())
    }

    fn evolve(&mut self) -> Result<(), MoError> {
        debug!("Generating the mating pool");
        let mating_pool = self.selector.select(
            self.population.individuals(),
            self.variation.mating_pool_size(),
            &mut self.rng,
        )?;

        debug!("Generating the offsprings");
        let mut offsprings = self.variation.evolve(&mating_pool, &mut self.rng)?;

        debug!("Evaluating the offsprings");
        self.nfe += if self.parallel {
            Self::do_parallel_evaluation(&mut offsprings)?
        } else {
            Self::do_evaluation(&mut offsprings)?
        };

        Self::update_archive(&mut self.archive, &offsprings)?;

        debug!("Selecting the survivors");
        let survivors = self
            .replacement
            .replace(self.population.individuals(), &offsprings)?;
        self.population = Population::new();
        self.population.add_new_individuals(survivors);

        // refresh the distance used by the crowded comparison in the next selection round
        set_crowding_distance(self.population.individuals_as_mut())?;

        self.generation += 1;
        Ok(())
    }

    fn generation(&self) -> usize {
        self.generation
    }

    fn number_of_function_evaluations(&self) -> usize {
        self.nfe
    }

    fn name(&self) -> String {
        self.args.name.clone()
    }

    fn start_time(&self) -> &Instant {
        &self.start_time
    }

    fn start_timestamp(&self) -> DateTime<Utc> {
        self.start_timestamp
    }

    fn stopping_condition(&self) -> &StoppingConditionType {
        &self.stopping_condition
    }

    fn population(&self) -> &Population {
        &self.population
    }

    fn problem(&self) -> Arc<Problem> {
        self.problem.clone()
    }

    fn observable(&self) -> &Observable {
        &self.observable
    }

    fn algorithm_options(&self) -> EvolutionaryAlgorithmArg {
        self.args.clone()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::{
        Algorithm, EvolutionaryAlgorithm, EvolutionaryAlgorithmArg, MaxGenerationValue,
        StoppingConditionType,
    };
    use crate::core::builtin_problems::SCHProblem;
    use crate::operators::{
        CrossoverAndMutation, CrowdedComparison, ParetoConstrainedDominance, PolynomialMutation,
        PolynomialMutationArgs, PreferredSolution, RankingAndCrowdingReplacement,
        SimulatedBinaryCrossover, SimulatedBinaryCrossoverArgs, TournamentSelector,
    };
    use crate::operators::BinaryComparisonOperator;

    fn algorithm(
        options: EvolutionaryAlgorithmArg,
    ) -> Result<EvolutionaryAlgorithm, crate::core::MoError> {
        let problem = SCHProblem::create()?;
        let crossover = SimulatedBinaryCrossover::new(SimulatedBinaryCrossoverArgs::default())?;
        let mutation = PolynomialMutation::new(PolynomialMutationArgs::default(&problem))?;
        let variation = CrossoverAndMutation::new(
            options.number_of_individuals,
            Box::new(crossover),
            Box::new(mutation),
        )?;
        EvolutionaryAlgorithm::new(
            problem,
            options,
            Box::new(TournamentSelector::<CrowdedComparison>::new(2)),
            Box::new(variation),
            Box::new(RankingAndCrowdingReplacement),
        )
    }

    fn options(number_of_individuals: usize) -> EvolutionaryAlgorithmArg {
        EvolutionaryAlgorithmArg {
            name: "EA".to_string(),
            number_of_individuals,
            archive_capacity: None,
            archive_output: false,
            stopping_condition: StoppingConditionType::MaxGeneration(MaxGenerationValue(10)),
            parallel: Some(false),
            seed: Some(1),
        }
    }

    #[test]
    /// The population must have at least 2 individuals.
    fn test_wrong_population_size() {
        let mut opts = options(1);
        opts.number_of_individuals = 1;
        assert!(algorithm(opts).is_err());
    }

    #[test]
    /// The archive output needs an archive capacity.
    fn test_archive_output_without_capacity() {
        let mut opts = options(10);
        opts.archive_output = true;
        assert!(algorithm(opts).is_err());
    }

    #[test]
    /// Smoke test on the SCH problem. The population size stays constant, all survivors are
    /// evaluated and ranked, and the stopping condition is honoured.
    fn test_run_sch() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut algorithm = algorithm(options(20)).unwrap();
        algorithm.run().unwrap();

        assert_eq!(algorithm.generation(), 10);
        assert_eq!(algorithm.population().len(), 20);
        // initial population + 9 evolve steps with 20 offsprings each
        assert_eq!(algorithm.number_of_function_evaluations(), 200);
        for individual in algorithm.population().individuals() {
            assert!(individual.is_evaluated());
            assert!(individual.rank().is_some());
        }
    }

    #[test]
    /// With an archive, the members are mutually non-dominated and within capacity.
    fn test_run_sch_with_archive() {
        let mut opts = options(20);
        opts.archive_capacity = Some(10);
        opts.archive_output = true;
        let mut algorithm = algorithm(opts).unwrap();
        algorithm.run().unwrap();

        let members = algorithm.archive().unwrap();
        assert!(!members.is_empty());
        assert!(members.len() <= 10);
        for (i, first) in members.iter().enumerate() {
            for second in members.iter().skip(i + 1) {
                assert_eq!(
                    ParetoConstrainedDominance::compare(first, second).unwrap(),
                    PreferredSolution::MutuallyPreferred
                );
            }
        }
        assert_eq!(algorithm.result_individuals().len(), members.len());
    }
}
