use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algorithms::{Algorithm, StoppingConditionType};
use crate::archive::{Archive, CrowdingDistanceArchive};
use crate::core::utils::get_rng;
use crate::core::{Individual, MoError, Population, Problem};
use crate::observer::Observable;
use crate::operators::{
    BinaryComparisonOperator, Mutation, ParetoConstrainedDominance, PolynomialMutation,
    PolynomialMutationArgs, PreferredSolution,
};
use crate::utils::set_crowding_distance;

/// The strategy to calculate the inertia weight in the velocity update.
#[derive(Serialize, Deserialize, Clone)]
pub enum InertiaWeightStrategy {
    /// Use the same weight at every iteration.
    Constant(f64),
    /// Decrease the weight linearly from `initial_weight` to `final_weight` over
    /// `max_iterations` iterations.
    LinearlyDecreasing {
        initial_weight: f64,
        final_weight: f64,
        max_iterations: usize,
    },
}

impl InertiaWeightStrategy {
    /// The inertia weight at the given iteration.
    ///
    /// # Arguments
    ///
    /// * `generation`: The iteration number.
    ///
    /// returns: `f64`
    pub fn weight(&self, generation: usize) -> f64 {
        match self {
            InertiaWeightStrategy::Constant(w) => *w,
            InertiaWeightStrategy::LinearlyDecreasing {
                initial_weight,
                final_weight,
                max_iterations,
            } => {
                let progress = if *max_iterations == 0 {
                    1.0
                } else {
                    (generation as f64 / *max_iterations as f64).min(1.0)
                };
                initial_weight - (initial_weight - final_weight) * progress
            }
        }
    }
}

/// Input arguments for [`ParticleSwarmOptimization`].
#[derive(Serialize, Deserialize, Clone)]
pub struct ParticleSwarmOptimizationArg {
    /// The number of particles in the swarm.
    pub number_of_particles: usize,
    /// The capacity of the external crowding-distance archive with the non-dominated solutions.
    /// The archive members are the algorithm result.
    pub archive_capacity: usize,
    /// The strategy to calculate the inertia weight. This defaults to a constant weight of 0.1.
    pub inertia_weight: Option<InertiaWeightStrategy>,
    /// The range the cognitive factor c1 is sampled from at each velocity update. This defaults
    /// to (1.5, 2.5).
    pub cognitive_factor_range: Option<(f64, f64)>,
    /// The range the social factor c2 is sampled from at each velocity update. This defaults to
    /// (1.5, 2.5).
    pub social_factor_range: Option<(f64, f64)>,
    /// The factor the velocity component is multiplied by when a particle hits a variable bound.
    /// This defaults to -1.0 (the particle bounces back).
    pub velocity_change_factor: Option<f64>,
    /// Apply the mutation-based perturbation to every K-th particle. This defaults to 6. Set to
    /// 0 to disable the perturbation.
    pub perturbation_frequency: Option<usize>,
    /// The options of the Polynomial Mutation (PM) operator used to perturb the particles. This
    /// defaults to [`PolynomialMutationArgs::default`].
    pub mutation_operator_options: Option<PolynomialMutationArgs>,
    /// The condition to use when to terminate the algorithm.
    pub stopping_condition: StoppingConditionType,
    /// Whether the objective and constraint evaluation in [`Problem::evaluator`] should run
    /// using threads. This defaults to `true`.
    pub parallel: Option<bool>,
    /// The seed used in the random number generator (RNG). You can specify a seed in case you
    /// want to try to reproduce results. This defaults to a random seed.
    pub seed: Option<u64>,
}

/// The speed-constrained multi-objective particle swarm optimiser (SMPSO).
///
/// Implemented based on:
/// > A.J. Nebro, J.J. Durillo, J. Garcia-Nieto, C.A. Coello Coello, F. Luna and E. Alba, "SMPSO:
/// > A new PSO-based metaheuristic for multi-objective optimization," 2009 IEEE Symposium on
/// > Computational Intelligence in Multi-Criteria Decision-Making, 2009, pp. 66-73,
/// > doi: 10.1109/MCDM.2009.4938830.
///
/// Each particle tracks its own best position; the global leaders live in a bounded
/// crowding-distance archive and are picked with a binary tournament on the crowding distance.
/// The velocity is constricted from the sampled cognitive and social factors and clamped per
/// variable to half the variable range.
pub struct ParticleSwarmOptimization {
    /// The problem being solved.
    problem: Arc<Problem>,
    /// The swarm with the particle positions.
    swarm: Population,
    /// The velocity vector of each particle.
    velocities: Vec<Vec<f64>>,
    /// The best position each particle has visited.
    local_bests: Vec<Individual>,
    /// The archive with the non-dominated solutions found during the run.
    archive: CrowdingDistanceArchive,
    /// The operator used to perturb the particles.
    mutation_operator: PolynomialMutation,
    /// The strategy to calculate the inertia weight.
    inertia_weight: InertiaWeightStrategy,
    /// The range the cognitive factor c1 is sampled from.
    cognitive_factor_range: (f64, f64),
    /// The range the social factor c2 is sampled from.
    social_factor_range: (f64, f64),
    /// The velocity multiplier applied when a particle hits a variable bound.
    velocity_change_factor: f64,
    /// Apply the perturbation to every K-th particle.
    perturbation_frequency: usize,
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
    args: ParticleSwarmOptimizationArg,
}

impl ParticleSwarmOptimization {
    /// Initialise the algorithm. This returns an error if the swarm has fewer than 2 particles,
    /// the archive capacity is zero or a factor range is inverted.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem being solved.
    /// * `options`: The [`ParticleSwarmOptimizationArg`] arguments to customise the algorithm
    ///   behaviour.
    ///
    /// returns: `Result<ParticleSwarmOptimization, MoError>`
    pub fn new(
        problem: Problem,
        options: ParticleSwarmOptimizationArg,
    ) -> Result<Self, MoError> {
        let name = "SMPSO".to_string();
        if options.number_of_particles < 2 {
            return Err(MoError::AlgorithmInit(
                name,
                "The swarm must have at least 2 particles".to_string(),
            ));
        }

        let cognitive_factor_range = options.cognitive_factor_range.unwrap_or((1.5, 2.5));
        let social_factor_range = options.social_factor_range.unwrap_or((1.5, 2.5));
        for (factor, range) in [
            ("cognitive", cognitive_factor_range),
            ("social", social_factor_range),
        ] {
            if range.0 > range.1 {
                return Err(MoError::AlgorithmInit(
                    name,
                    format!(
                        "The {} factor range ({}, {}) must have its lower bound first",
                        factor, range.0, range.1
                    ),
                ));
            }
        }

        let problem = Arc::new(problem);
        let archive =
            CrowdingDistanceArchive::new(options.archive_capacity, problem.number_of_objectives())?;

        let mutation_options = match &options.mutation_operator_options {
            Some(o) => o.clone(),
            None => PolynomialMutationArgs::default(problem.as_ref()),
        };
        let mutation_operator = PolynomialMutation::new(mutation_options)?;

        let mut rng = get_rng(options.seed);
        info!("Created initial random swarm");
        let swarm = Population::init(problem.clone(), options.number_of_particles, &mut rng);
        let velocities =
            vec![vec![0.0; problem.number_of_variables()]; options.number_of_particles];

        Ok(Self {
            problem,
            swarm,
            velocities,
            local_bests: Vec::new(),
            archive,
            mutation_operator,
            inertia_weight: options
                .inertia_weight
                .clone()
                .unwrap_or(InertiaWeightStrategy::Constant(0.1)),
            cognitive_factor_range,
            social_factor_range,
            velocity_change_factor: options.velocity_change_factor.unwrap_or(-1.0),
            perturbation_frequency: options.perturbation_frequency.unwrap_or(6),
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

    /// Get the archive members with the non-dominated solutions found so far.
    ///
    /// return: `&[Individual]`
    pub fn archive(&self) -> &[Individual] {
        self.archive.individuals()
    }

    /// The constriction coefficient from the sampled cognitive and social factors.
    fn constriction_coefficient(c1: f64, c2: f64) -> f64 {
        let rho = c1 + c2;
        if rho <= 4.0 {
            1.0
        } else {
            2.0 / (2.0 - rho - (rho.powi(2) - 4.0 * rho).sqrt())
        }
    }

    /// Pick the global leader with a binary tournament on the crowding distance over the archive
    /// members. The distances must have been refreshed on the `leaders` copy.
    fn select_global_best<'a>(
        leaders: &'a [Individual],
        rng: &mut dyn RngCore,
    ) -> &'a Individual {
        if leaders.len() == 1 {
            return &leaders[0];
        }
        // draw two distinct members
        let first_index = rng.gen_range(0..leaders.len());
        let mut second_index = rng.gen_range(0..leaders.len() - 1);
        if second_index >= first_index {
            second_index += 1;
        }
        let first = &leaders[first_index];
        let second = &leaders[second_index];
        let d1 = first.crowding_distance().unwrap_or(0.0);
        let d2 = second.crowding_distance().unwrap_or(0.0);
        if d1 >= d2 {
            first
        } else {
            second
        }
    }

    /// Move one particle: update its velocity, apply the new position with the bound handling
    /// and return the new unevaluated particle.
    fn move_particle(
        &mut self,
        particle_index: usize,
        global_best: &Individual,
        weight: f64,
    ) -> Result<Individual, MoError> {
        let particle = &self.swarm.individuals()[particle_index];
        let local_best = &self.local_bests[particle_index];

        let c1 = self
            .rng
            .gen_range(self.cognitive_factor_range.0..=self.cognitive_factor_range.1);
        let c2 = self
            .rng
            .gen_range(self.social_factor_range.0..=self.social_factor_range.1);
        let r1: f64 = self.rng.gen_range(0.0..=1.0);
        let r2: f64 = self.rng.gen_range(0.0..=1.0);
        let chi = Self::constriction_coefficient(c1, c2);

        let mut new_particle = particle.clone_variables();
        for var_index in 0..self.problem.number_of_variables() {
            let x = particle.get_variable_value(var_index)?;
            let (lower, upper) = self.problem.variable_bounds(var_index)?;
            let velocity = &mut self.velocities[particle_index][var_index];

            let new_velocity = chi
                * (weight * *velocity
                    + c1 * r1 * (local_best.get_variable_value(var_index)? - x)
                    + c2 * r2 * (global_best.get_variable_value(var_index)? - x));

            // clamp the velocity to half the variable range
            let delta = (upper - lower) / 2.0;
            let mut new_velocity = new_velocity.clamp(-delta, delta);

            // move the particle and bounce it back from the bounds
            let mut new_x = x + new_velocity;
            if new_x < lower {
                new_x = lower;
                new_velocity *= self.velocity_change_factor;
            } else if new_x > upper {
                new_x = upper;
                new_velocity *= self.velocity_change_factor;
            }

            *velocity = new_velocity;
            new_particle.update_variable(var_index, new_x)?;
        }

        Ok(new_particle)
    }

    /// Replace the local best with the new position when the stored best does not dominate it.
    fn update_local_bests(&mut self) -> Result<(), MoError> {
        for (particle, local_best) in self
            .swarm
            .individuals()
            .iter()
            .zip(self.local_bests.iter_mut())
        {
            if ParetoConstrainedDominance::compare(local_best, particle)?
                != PreferredSolution::First
            {
                *local_best = particle.clone();
            }
        }
        Ok(())
    }
}

impl Display for ParticleSwarmOptimization {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SMPSO")
    }
}

impl Algorithm<ParticleSwarmOptimizationArg> for ParticleSwarmOptimization {
    /// Evaluate the initial swarm, initialise the local bests and fill the archive.
    ///
    /// return: `Result<(), MoError>`
    fn initialise(&mut self) -> Result<(), MoError> {
        info!("Evaluating initial swarm");
        self.nfe += if self.parallel {
            Self::do_parallel_evaluation(self.swarm.individuals_as_mut())?
        } else {
            Self::do_evaluation(self.swarm.individuals_as_mut())?
        };

        self.local_bests = self.swarm.individuals().to_vec();
        for particle in self.swarm.individuals() {
            self.archive.add(particle)?;
        }

        info!("Initial evaluation completed");
        self.generation += 1;
        Ok(())
    }

    fn evolve(&mut self) -> Result<(), MoError> {
        // refresh the crowding distance on a copy of the leaders for the tournament
        let mut leaders = self.archive.individuals().to_vec();
        set_crowding_distance(&mut leaders)?;

        let weight = self.inertia_weight.weight(self.generation);
        debug!("Moving the swarm with inertia weight {}", weight);

        let mut new_swarm: Vec<Individual> = Vec::with_capacity(self.swarm.len());
        for particle_index in 0..self.swarm.len() {
            let global_best = Self::select_global_best(&leaders, &mut self.rng).clone();
            let mut new_particle = self.move_particle(particle_index, &global_best, weight)?;

            // perturb every K-th particle
            if self.perturbation_frequency > 0
                && particle_index % self.perturbation_frequency == 0
            {
                new_particle = self
                    .mutation_operator
                    .mutate_offspring(&new_particle, &mut self.rng)?;
            }
            new_swarm.push(new_particle);
        }

        debug!("Evaluating the swarm");
        self.nfe += if self.parallel {
            Self::do_parallel_evaluation(&mut new_swarm)?
        } else {
            Self::do_evaluation(&mut new_swarm)?
        };

        self.swarm = Population::new();
        self.swarm.add_new_individuals(new_swarm);

        for particle in self.swarm.individuals() {
            self.archive.add(particle)?;
        }
        self.update_local_bests()?;

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
        "SMPSO".to_string()
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
        &self.swarm
    }

    fn problem(&self) -> Arc<Problem> {
        self.problem.clone()
    }

    fn observable(&self) -> &Observable {
        &self.observable
    }

    fn algorithm_options(&self) -> ParticleSwarmOptimizationArg {
        self.args.clone()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::{
        Algorithm, MaxGenerationValue, ParticleSwarmOptimization, ParticleSwarmOptimizationArg,
        StoppingConditionType,
    };
    use crate::core::builtin_problems::SCHProblem;
    use crate::core::utils::get_rng;
    use crate::core::utils::test_utils::individuals_from_obj_values;
    use crate::operators::{
        BinaryComparisonOperator, ParetoConstrainedDominance, PreferredSolution,
    };

    fn options(number_of_particles: usize) -> ParticleSwarmOptimizationArg {
        ParticleSwarmOptimizationArg {
            number_of_particles,
            archive_capacity: 10,
            inertia_weight: None,
            cognitive_factor_range: None,
            social_factor_range: None,
            velocity_change_factor: None,
            perturbation_frequency: None,
            mutation_operator_options: None,
            stopping_condition: StoppingConditionType::MaxGeneration(MaxGenerationValue(10)),
            parallel: Some(false),
            seed: Some(1),
        }
    }

    #[test]
    /// The swarm must have at least 2 particles.
    fn test_wrong_swarm_size() {
        let problem = SCHProblem::create().unwrap();
        assert!(ParticleSwarmOptimization::new(problem, options(1)).is_err());
    }

    #[test]
    /// An inverted factor range is rejected.
    fn test_wrong_factor_range() {
        let problem = SCHProblem::create().unwrap();
        let mut opts = options(10);
        opts.cognitive_factor_range = Some((2.5, 1.5));
        assert!(ParticleSwarmOptimization::new(problem, opts).is_err());
    }

    #[test]
    /// The global-best tournament compares two distinct leaders, so with two leaders the one
    /// with the larger crowding distance always wins.
    fn test_global_best_tournament() {
        let mut leaders = individuals_from_obj_values(&[[0.0, 1.0], [1.0, 0.0]]);
        leaders[0].set_crowding_distance(0.1);
        leaders[1].set_crowding_distance(f64::INFINITY);

        let mut rng = get_rng(Some(1));
        for _ in 0..20 {
            let best = ParticleSwarmOptimization::select_global_best(&leaders, &mut rng);
            assert_eq!(best.objective_values(), &[1.0, 0.0]);
        }
    }

    #[test]
    /// Smoke test on the SCH problem. The swarm size stays constant, the particles remain
    /// within the variable bounds and the archive holds mutually non-dominated solutions.
    fn test_run_sch() {
        let _ = env_logger::builder().is_test(true).try_init();
        let problem = SCHProblem::create().unwrap();
        let mut algorithm = ParticleSwarmOptimization::new(problem, options(20)).unwrap();
        algorithm.run().unwrap();

        assert_eq!(algorithm.generation(), 10);
        assert_eq!(algorithm.population().len(), 20);
        assert_eq!(algorithm.number_of_function_evaluations(), 200);
        for particle in algorithm.population().individuals() {
            assert!(particle.is_evaluated());
            let x = particle.get_variable_value(0).unwrap();
            assert!((-1000.0..=1000.0).contains(&x));
        }

        let members = algorithm.archive();
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
    }
}
