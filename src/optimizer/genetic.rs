//! Genetic search over green-time vectors
//!
//! Generations are immutable snapshots: [`GeneticOptimizer::next_generation`]
//! reads one [`Population`] and returns a new one. Offspring of a generation
//! are bred first, then scored together on the rayon pool. Every evaluation
//! gets its own RNG seeded from the master stream, so a fixed master seed
//! reproduces the whole run regardless of thread scheduling.

use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeMap;

use super::config::GaConfig;
use super::constraint::CycleConstraint;
use super::fitness::FitnessEvaluator;
use crate::simulation::{LaneTopology, Result, SignalError, ELITE_COUNT, GENE_MAX, GENE_MIN};

/// A scored candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    /// Green time per lane, in topology order
    pub genes: Vec<f64>,
    pub fitness: f64,
    pub lane_waits: BTreeMap<String, f64>,
}

/// One generation, sorted by ascending fitness
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    members: Vec<Scored>,
}

impl Population {
    fn new(mut members: Vec<Scored>) -> Self {
        members.sort_by_key(|member| OrderedFloat(member.fitness));
        Self { members }
    }

    pub fn members(&self) -> &[Scored] {
        &self.members
    }

    pub fn best(&self) -> Option<&Scored> {
        self.members.first()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Final outcome of an optimization run
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Best green time per lane
    pub best: BTreeMap<String, f64>,
    pub fitness: f64,
    /// Per-lane average waits of the best candidate's run
    pub lane_waits: BTreeMap<String, f64>,
    /// Best fitness per generation, starting with the initial population
    pub history: Vec<f64>,
    /// Lane names in topology order
    pub lanes: Vec<String>,
    /// Master seed actually used
    pub seed: u64,
}

impl OptimizationResult {
    /// Best green times as whole seconds joined by commas, in lane order
    pub fn relay_line(&self) -> String {
        self.lanes
            .iter()
            .map(|lane| {
                let green = self.best.get(lane).copied().unwrap_or(0.0);
                (green.trunc() as i64).to_string()
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub struct GeneticOptimizer<'a> {
    topology: &'a LaneTopology,
    config: &'a GaConfig,
    constraint: CycleConstraint,
    evaluator: FitnessEvaluator<'a>,
}

impl<'a> GeneticOptimizer<'a> {
    pub fn new(topology: &'a LaneTopology, config: &'a GaConfig) -> Result<Self> {
        if topology.is_empty() {
            return Err(SignalError::DegenerateNetwork);
        }
        config.validate()?;

        Ok(Self {
            topology,
            config,
            constraint: CycleConstraint::new(topology, config.cycle_limit),
            evaluator: FitnessEvaluator::new(topology, &config.simulation, config.cycle_limit),
        })
    }

    pub fn constraint(&self) -> &CycleConstraint {
        &self.constraint
    }

    /// Genes drawn uniformly from the gene range, then scaled into the limit
    pub fn random_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let mut genes: Vec<f64> = (0..self.topology.len())
            .map(|_| rng.random_range(GENE_MIN..GENE_MAX))
            .collect();
        self.constraint.enforce(&mut genes);
        genes
    }

    /// Uniform crossover: each gene from either parent with equal probability
    pub fn crossover<R: Rng + ?Sized>(&self, a: &[f64], b: &[f64], rng: &mut R) -> Vec<f64> {
        let mut child: Vec<f64> = a
            .iter()
            .zip(b)
            .map(|(&x, &y)| if rng.random_bool(0.5) { x } else { y })
            .collect();
        self.constraint.enforce(&mut child);
        child
    }

    /// With probability `mutation_rate`, resample one random gene
    pub fn mutate<R: Rng + ?Sized>(&self, genes: &mut [f64], rng: &mut R) {
        if genes.is_empty() || !rng.random_bool(self.config.mutation_rate) {
            return;
        }
        let lane = rng.random_range(0..genes.len());
        genes[lane] = rng.random_range(GENE_MIN..GENE_MAX);
        self.constraint.enforce(genes);
    }

    /// Tournament of two: the fitter of two uniformly drawn members
    pub fn tournament_select<'p, R: Rng + ?Sized>(
        &self,
        population: &'p Population,
        rng: &mut R,
    ) -> Option<&'p Scored> {
        let a = population.members.choose(rng)?;
        let b = population.members.choose(rng)?;
        Some(if a.fitness < b.fitness { a } else { b })
    }

    /// Score candidates in parallel, each with its own seeded stream
    fn evaluate_batch<R: Rng + ?Sized>(
        &self,
        candidates: Vec<Vec<f64>>,
        rng: &mut R,
    ) -> Result<Vec<Scored>> {
        let jobs: Vec<(Vec<f64>, u64)> = candidates
            .into_iter()
            .map(|genes| (genes, rng.random::<u64>()))
            .collect();

        jobs.into_par_iter()
            .map(|(genes, seed)| -> Result<Scored> {
                let mut stream = StdRng::seed_from_u64(seed);
                let evaluation = self.evaluator.evaluate(&genes, &mut stream)?;
                Ok(Scored {
                    genes,
                    fitness: evaluation.fitness,
                    lane_waits: evaluation.lane_waits,
                })
            })
            .collect()
    }

    pub fn initial_population<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Population> {
        let candidates = (0..self.config.pop_size)
            .map(|_| self.random_candidate(rng))
            .collect();
        Ok(Population::new(self.evaluate_batch(candidates, rng)?))
    }

    /// Breed the generation following `current`
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        current: &Population,
        rng: &mut R,
    ) -> Result<Population> {
        let elites: Vec<Scored> = current.members.iter().take(ELITE_COUNT).cloned().collect();
        let offspring_count = self.config.pop_size.saturating_sub(elites.len());

        let mut offspring = Vec::with_capacity(offspring_count);
        for _ in 0..offspring_count {
            let (Some(a), Some(b)) = (
                self.tournament_select(current, rng),
                self.tournament_select(current, rng),
            ) else {
                return Err(SignalError::InvalidConfig(
                    "cannot select parents from an empty population".to_string(),
                ));
            };
            let mut child = self.crossover(&a.genes, &b.genes, rng);
            self.mutate(&mut child, rng);
            offspring.push(child);
        }

        let mut members = elites;
        members.extend(self.evaluate_batch(offspring, rng)?);
        Ok(Population::new(members))
    }

    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Population, Vec<f64>)> {
        let mut population = self.initial_population(rng)?;
        let mut history = Vec::with_capacity(self.config.generations + 1);
        history.extend(population.best().map(|best| best.fitness));

        for generation in 0..self.config.generations {
            population = self.next_generation(&population, rng)?;
            if let Some(best) = population.best() {
                info!(
                    "GA generation {}/{} best fitness {:.3}",
                    generation + 1,
                    self.config.generations,
                    best.fitness
                );
                history.push(best.fitness);
            }
        }

        Ok((population, history))
    }

    pub fn run(&self) -> Result<OptimizationResult> {
        let seed = self.config.seed.unwrap_or_else(|| {
            let seed = rand::rng().random::<u64>();
            info!("no GA seed configured, using {}", seed);
            seed
        });
        let mut rng = StdRng::seed_from_u64(seed);

        let (population, history) = self.run_with_rng(&mut rng)?;
        let best = population.best().ok_or(SignalError::DegenerateNetwork)?;

        let lanes: Vec<String> = self
            .topology
            .lanes
            .iter()
            .map(|lane| lane.name.clone())
            .collect();
        let best_map = lanes
            .iter()
            .cloned()
            .zip(best.genes.iter().copied())
            .collect();

        debug!("GA finished with fitness history {:?}", history);

        Ok(OptimizationResult {
            best: best_map,
            fitness: best.fitness,
            lane_waits: best.lane_waits.clone(),
            history,
            lanes,
            seed,
        })
    }
}

/// Search for green times minimizing the worst per-lane average wait
pub fn optimize(topology: &LaneTopology, config: &GaConfig) -> Result<OptimizationResult> {
    GeneticOptimizer::new(topology, config)?.run()
}
