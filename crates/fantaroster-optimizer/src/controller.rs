use std::time::{Duration, Instant};

use fantaroster_core::{Formation, ObjectiveWeights, OptimizerSeed, Player, PlayerId};
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    Candidate, Evolver, ObjectiveScores, OptimizeError, Population, SwapSuggestion,
    evaluate_population, suggest_swaps,
};

/// Cooperative cancellation signal, polled between generations.
///
/// The optimizer never blocks on the deadline; it checks it once per
/// generation boundary and, when expired, returns the best roster found so
/// far flagged as partial instead of raising an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// A deadline at the given instant.
    #[must_use]
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// A deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn expired(self) -> bool {
        Instant::now() >= self.0
    }
}

/// Tuning knobs for one optimization call.
///
/// The defaults reproduce the advisor's standard search; tests and callers
/// with unusual pools can override any of them.
#[derive(Debug, Clone, Copy)]
pub struct OptimizerConfig {
    /// Generation limit.
    pub max_generations: usize,
    /// Candidates per generation.
    pub population_size: usize,
    /// Probability that a child undergoes a one-slot mutation.
    pub mutation_rate: f64,
    /// Fraction of the population carried over unchanged each generation
    /// (at least one candidate).
    pub elite_fraction: f64,
    /// Candidates per selection tournament.
    pub tournament_size: usize,
    /// Generations without best-fitness improvement before early stopping.
    pub stagnation_window: usize,
    /// Alternatives considered per rostered player when building swap
    /// suggestions.
    pub top_alternatives: usize,
    /// Seed for the run's random number generator; a random seed is drawn
    /// when absent.
    pub seed: Option<OptimizerSeed>,
    /// Optional cancellation deadline, polled between generations.
    pub deadline: Option<Deadline>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_generations: 50,
            population_size: 100,
            mutation_rate: 0.15,
            elite_fraction: 0.10,
            tournament_size: 3,
            stagnation_window: 10,
            top_alternatives: 5,
            seed: None,
            deadline: None,
        }
    }
}

impl OptimizerConfig {
    /// Number of elite candidates implied by `elite_fraction`, at least one.
    #[must_use]
    pub fn elite_count(&self) -> usize {
        #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        #[expect(clippy::cast_sign_loss)]
        let count = (self.population_size as f64 * self.elite_fraction).round() as usize;
        count.clamp(1, self.population_size)
    }
}

/// Lifecycle of one optimization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Building the initial population.
    Initializing,
    /// Running the generation loop.
    Evolving,
    /// Stopped early: the best fitness stagnated.
    Converged,
    /// Ran to the generation limit or the deadline.
    Done,
    /// Initialization could not fill the population.
    Failed,
}

/// Transient state of one optimization call.
///
/// Owns the run's random number generator and the best-so-far bookkeeping.
/// The recorded best fitness only ever increases: a generation's best
/// replaces it only when strictly greater, and the per-generation history
/// stores the running maximum. Discarded when the call returns; nothing
/// persists across calls.
#[derive(Debug)]
pub struct EvolutionRun {
    rng: Pcg32,
    phase: Phase,
    generation: usize,
    best: Option<Candidate>,
    best_fitness: f64,
    history: Vec<f64>,
    stagnant: usize,
}

impl EvolutionRun {
    /// Starts a run in the `Initializing` phase with a seeded generator.
    #[must_use]
    pub fn new(seed: OptimizerSeed) -> Self {
        Self {
            rng: seed.into_rng(),
            phase: Phase::Initializing,
            generation: 0,
            best: None,
            best_fitness: f64::NEG_INFINITY,
            history: Vec::new(),
            stagnant: 0,
        }
    }

    /// Records one evaluated generation's best candidate.
    ///
    /// Returns whether the running best improved.
    fn observe(&mut self, generation_best: &Candidate) -> bool {
        self.generation += 1;
        let improved = generation_best.fitness() > self.best_fitness;
        if improved {
            self.best_fitness = generation_best.fitness();
            self.best = Some(generation_best.clone());
            self.stagnant = 0;
        } else {
            self.stagnant += 1;
        }
        self.history.push(self.best_fitness);
        improved
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Generations evaluated so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best candidate observed so far, if any generation has been evaluated.
    #[must_use]
    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    /// Running-maximum best fitness per generation; non-decreasing.
    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

/// Outcome of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Rostered player identifiers in role-major order.
    pub roster: Vec<PlayerId>,
    /// Total roster cost in credits.
    pub total_cost: u32,
    /// Raw, pre-normalization objective scores of the winning roster.
    pub objective_scores: ObjectiveScores,
    /// Best fitness recorded by the run.
    pub fitness: f64,
    /// Generations evaluated before stopping.
    pub generations_run: usize,
    /// True when a deadline cut the search short.
    pub partial: bool,
    /// Running-maximum best fitness per generation; non-decreasing.
    pub best_fitness_history: Vec<f64>,
    /// Ranked single-swap improvement proposals, best first.
    pub suggestions: Vec<SwapSuggestion>,
}

/// Builds an approximately optimal roster for the given pool, budget,
/// formation and objective weights.
///
/// Runs the full genetic search: feasibility-checked initialization,
/// population-normalized evaluation, elitism plus tournament selection,
/// per-role crossover and one-slot mutation, stagnation-based early
/// stopping, and swap-suggestion extraction from the final best roster.
///
/// Infeasible inputs fail fast with [`OptimizeError`] before any generation
/// runs. An expired [`Deadline`] is not an error: the call returns the best
/// roster found so far with `partial` set.
///
/// With a fixed `seed` in the config, identical inputs produce identical
/// results.
pub fn build_optimal_team(
    pool: &[Player],
    budget: u32,
    formation: &Formation,
    weights: &ObjectiveWeights,
    config: &OptimizerConfig,
) -> Result<OptimizationResult, OptimizeError> {
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut run = EvolutionRun::new(seed);

    log::debug!(
        "initializing population of {} for formation {formation} (budget {budget})",
        config.population_size,
    );
    let mut population = match Population::initialize(
        pool,
        budget,
        formation,
        config.population_size,
        &mut run.rng,
    ) {
        Ok(population) => population,
        Err(err) => {
            run.phase = Phase::Failed;
            log::debug!("initialization failed: {err}");
            return Err(err);
        }
    };
    run.phase = Phase::Evolving;

    let evolver = Evolver {
        elite_count: config.elite_count(),
        tournament_size: config.tournament_size,
        mutation_rate: config.mutation_rate.clamp(0.0, 1.0),
    };

    let max_generations = config.max_generations.max(1);
    let mut partial = false;
    let mut bounds = None;
    for generation in 0..max_generations {
        bounds = Some(evaluate_population(&mut population, weights));
        let generation_best = population
            .best()
            .expect("population is never empty")
            .clone();
        let improved = run.observe(&generation_best);
        let stats = population
            .fitness_stats()
            .expect("population is never empty");
        log::debug!(
            "generation {generation}: best {:.4}, mean {:.4}, best so far {:.4}{}",
            generation_best.fitness(),
            stats.mean,
            run.best_fitness,
            if improved { " (improved)" } else { "" },
        );

        if run.stagnant >= config.stagnation_window {
            run.phase = Phase::Converged;
            log::debug!("stopping: no improvement for {} generations", run.stagnant);
            break;
        }
        if generation + 1 == max_generations {
            run.phase = Phase::Done;
            break;
        }
        if config.deadline.is_some_and(Deadline::expired) {
            partial = true;
            run.phase = Phase::Done;
            log::debug!("deadline reached, returning partial result");
            break;
        }

        population = evolver.evolve(&population, pool, budget, formation, &mut run.rng);
    }

    let bounds = bounds.expect("at least one generation always runs");
    let best = run.best.clone().expect("at least one generation always runs");
    let suggestions = suggest_swaps(
        &best,
        pool,
        budget,
        weights,
        &bounds,
        config.top_alternatives,
    );

    Ok(OptimizationResult {
        roster: best.roster().players(pool).map(|p| p.id.clone()).collect(),
        total_cost: best.total_cost(),
        objective_scores: best.objectives(),
        fitness: run.best_fitness,
        generations_run: run.generation,
        partial,
        best_fitness_history: run.history.clone(),
        suggestions,
    })
}
