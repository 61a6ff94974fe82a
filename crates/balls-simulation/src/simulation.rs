//! Frame scheduler
//!
//! One tick runs three passes over the balls: integration, wall bounces, and
//! then the pair collisions cell by cell. The first two passes are
//! embarrassingly parallel. Within a cell every ball belongs to at most one
//! pair, so each pair gets exclusive `&mut` access to its two balls and the
//! pairs run in parallel without locks. Cells run strictly in order because a
//! later cell may read a ball an earlier cell just moved.

use balls_physics::{integrate, resolve_pair, resolve_walls, Body, BodyStore, ConfigError};
use glam::DVec2;
use rayon::prelude::*;

use crate::params::SimulationParams;
use crate::partition::{Cell, Partition};
use crate::placement::Placement;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Pairs that were in contact and got resolved
    pub contacts: usize,
    /// Cells that were large enough to be resolved on the thread pool
    pub parallel_cells: usize,
}

/// CPU bouncing-balls simulation
pub struct Simulation {
    store: BodyStore,
    partition: Partition,
    params: SimulationParams,
    frame: u64,
    elapsed: f64,
}

impl Simulation {
    /// Random balls according to `params`
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        log::info!("Initializing Simulation with {} balls...", params.ball_count);
        let store = Placement::new(params.seed).bodies(&params)?;
        Self::with_bodies(store, params)
    }

    /// Simulate an existing set of balls. Wall bounces use the store's own
    /// bounds; `params.bounds` only matters for placement.
    pub fn with_bodies(store: BodyStore, params: SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let partition = Partition::build_with(store.len(), params.partition_strategy);

        Ok(Self {
            store,
            partition,
            params,
            frame: 0,
            elapsed: 0.0,
        })
    }

    /// Advance by one fixed timestep
    pub fn step(&mut self) -> TickStats {
        self.tick(self.params.timestep)
    }

    /// Advance by `dt` seconds. `dt` must be positive.
    pub fn tick(&mut self, dt: f64) -> TickStats {
        debug_assert!(dt > 0.0, "tick called with non-positive dt {dt}");
        debug_assert_eq!(self.partition.body_count(), self.store.len());

        let bounds = self.store.bounds();
        let bodies = self.store.bodies_mut();
        let mut stats = TickStats::default();

        // Step 1: Integrate motion
        integrate(bodies, dt, self.params.gravity);

        // Step 2: Bounce off the walls
        resolve_walls(bodies, &bounds);

        // Step 3: Ball-ball collisions, one cell at a time
        for cell in &self.partition {
            let parallel = cell.len() >= self.params.parallel_threshold;
            if parallel {
                stats.parallel_cells += 1;
            }
            stats.contacts += resolve_cell(bodies, cell, self.params.epsilon, parallel);
        }

        self.frame += 1;
        self.elapsed += dt;
        log::trace!("Frame {}: {} contacts", self.frame, stats.contacts);

        stats
    }

    /// Replace the balls. The partition is rebuilt when the count changes.
    pub fn set_bodies(&mut self, store: BodyStore) {
        if store.len() != self.partition.body_count() {
            log::info!(
                "Ball count changed from {} to {}, rebuilding partition",
                self.partition.body_count(),
                store.len()
            );
            self.partition = Partition::build_with(store.len(), self.params.partition_strategy);
        }
        self.store = store;
    }

    /// Swap in new parameters. The partition is rebuilt if the strategy
    /// changed; the balls are left alone.
    pub fn update_params(&mut self, params: SimulationParams) -> Result<(), ConfigError> {
        params.validate()?;
        if params.partition_strategy != self.params.partition_strategy {
            self.partition = Partition::build_with(self.store.len(), params.partition_strategy);
        }
        self.params = params;
        Ok(())
    }

    pub fn store(&self) -> &BodyStore {
        &self.store
    }

    pub fn bodies(&self) -> &[Body] {
        self.store.bodies()
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Number of ticks run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.store.kinetic_energy()
    }

    /// Gravitational potential energy relative to y = 0
    pub fn potential_energy(&self) -> f64 {
        self.store
            .iter()
            .map(|b| b.mass * self.params.gravity * b.position.y)
            .sum()
    }

    pub fn momentum(&self) -> DVec2 {
        self.store.momentum()
    }
}

/// Resolve every pair of one cell, returning how many were in contact
fn resolve_cell(bodies: &mut [Body], cell: &Cell, epsilon: f64, parallel: bool) -> usize {
    if !parallel {
        let mut contacts = 0;
        for &(a, b) in cell {
            let (b1, b2) = pair_mut(bodies, a, b);
            if resolve_pair(b1, b2, epsilon) {
                contacts += 1;
            }
        }
        return contacts;
    }

    cell_pairs(bodies, cell)
        .into_par_iter()
        .map(|(b1, b2)| resolve_pair(b1, b2, epsilon))
        .filter(|&hit| hit)
        .count()
}

/// Disjoint `&mut` borrows for every pair of a cell, in cell order
///
/// Walks the slice once over the cell's endpoints sorted by index, splitting
/// off one ball at a time. A ball requested twice means the cell is not a
/// matching, which would be a partitioner bug.
fn cell_pairs<'a>(bodies: &'a mut [Body], cell: &Cell) -> Vec<(&'a mut Body, &'a mut Body)> {
    // (ball index, position among the cell's endpoints)
    let mut ends: Vec<(usize, usize)> = cell
        .iter()
        .enumerate()
        .flat_map(|(k, &(a, b))| [(a, 2 * k), (b, 2 * k + 1)])
        .collect();
    ends.sort_unstable();

    let mut placed: Vec<(usize, &'a mut Body)> = Vec::with_capacity(ends.len());
    let mut rest = bodies;
    let mut next = 0;
    for (index, slot) in ends {
        assert!(index >= next, "ball {index} appears twice in one cell");
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(index - next);
        let Some((body, tail)) = tail.split_first_mut() else {
            panic!("ball {index} is out of range");
        };
        placed.push((slot, body));
        rest = tail;
        next = index + 1;
    }
    placed.sort_unstable_by_key(|&(slot, _)| slot);

    let mut borrowed = placed.into_iter().map(|(_, body)| body);
    let mut pairs = Vec::with_capacity(cell.len());
    while let (Some(b1), Some(b2)) = (borrowed.next(), borrowed.next()) {
        pairs.push((b1, b2));
    }
    pairs
}

/// Two distinct balls by index, `a < b`
fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    debug_assert!(a < b);
    let (lo, hi) = bodies.split_at_mut(b);
    (&mut lo[a], &mut hi[0])
}
