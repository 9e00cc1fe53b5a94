//! Time-step driver: owns the two grid buffers and runs the
//! (update, exchange, swap) cycle, then reduces and reports.
//!
//! Buffer roles rotate every step. After [`HeatSolver::step`] the grid
//! that was just written is the *previous* buffer, ready to be read by the
//! next update; [`HeatSolver::latest`] always returns it.

use crate::algs::communicator::Communicator;
use crate::algs::halo::{self, HaloLayout};
use crate::algs::init::init_with;
use crate::algs::reduction::{LocalSum, ReductionScope, global_mean, local_sum};
use crate::algs::stencil;
use crate::config::HeatConfig;
use crate::grid::{Cell, GridBuffer};
use crate::heat_error::HeatError;
use crate::topology::{RankTopology, RowBand};
use std::io::Write;
use std::time::{Duration, Instant};

/// Per-rank solver state for one run.
pub struct HeatSolver<'c, T, C: ?Sized> {
    config: HeatConfig,
    comm: &'c C,
    topo: RankTopology,
    band: RowBand,
    current: GridBuffer<T>,
    previous: GridBuffer<T>,
    steps_taken: usize,
}

impl<'c, T, C> HeatSolver<'c, T, C>
where
    T: Cell,
    C: Communicator + ?Sized,
{
    /// Validate `config` against the group, allocate both grids and seed
    /// this rank's band of the previous buffer.
    ///
    /// With [`HaloLayout::Ghost`] the seeded buffer is exchanged once so
    /// the first update already sees the neighbours' boundary rows; this
    /// is a collective call in that case.
    pub fn new(config: &HeatConfig, comm: &'c C) -> Result<Self, HeatError> {
        config.validate(comm.size())?;
        let topo = RankTopology::new(comm.rank(), comm.size())?;
        let band = RowBand::for_rank(config.n, topo.rank, topo.size)?;

        let current = GridBuffer::new(config.n);
        let mut previous = GridBuffer::new(config.n);
        init_with(band, &mut previous.view_mut(), config.seed);
        if config.halo == HaloLayout::Ghost && !topo.is_single() {
            halo::exchange(band, &mut previous.view_mut(), &topo, comm, HaloLayout::Ghost)?;
        }

        log::info!(
            "rank {}/{}: rows {}..{} of {}, halo {}, seed {}",
            topo.rank,
            topo.size,
            band.start,
            band.stop,
            config.n,
            config.halo,
            config.seed
        );

        Ok(Self {
            config: config.clone(),
            comm,
            topo,
            band,
            current,
            previous,
            steps_taken: 0,
        })
    }

    /// Stencil phase: current ← update(previous) over this rank's band.
    pub fn update(&mut self) {
        stencil::update(self.band, &mut self.current.view_mut(), self.previous.view());
    }

    /// Exchange phase on the current buffer.
    pub fn exchange(&mut self) -> Result<(), HeatError> {
        halo::exchange(
            self.band,
            &mut self.current.view_mut(),
            &self.topo,
            self.comm,
            self.config.halo,
        )
    }

    /// Rotate buffer roles without copying.
    pub fn swap_roles(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
    }

    /// One full time step.
    pub fn step(&mut self) -> Result<(), HeatError> {
        self.update();
        self.exchange()?;
        self.swap_roles();
        self.steps_taken += 1;
        Ok(())
    }

    pub fn run_steps(&mut self, steps: usize) -> Result<(), HeatError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Local `(sum, count)` of the latest grid under the configured scope.
    pub fn local_sum(&self) -> LocalSum {
        if self.config.reduction == ReductionScope::FullGrid && !self.topo.is_single() {
            log::warn!(
                "rank {}: full-grid reduction includes rows outside {}..{} that this rank never updates",
                self.topo.rank,
                self.band.start,
                self.band.stop
            );
        }
        local_sum(self.latest().view(), self.band, self.config.reduction)
    }

    /// Buffer the next update will write.
    pub fn current(&self) -> &GridBuffer<T> {
        &self.current
    }

    /// Buffer the next update will read.
    pub fn previous(&self) -> &GridBuffer<T> {
        &self.previous
    }

    /// Most recently completed grid (the seed before any step).
    pub fn latest(&self) -> &GridBuffer<T> {
        &self.previous
    }

    pub fn band(&self) -> RowBand {
        self.band
    }

    pub fn topology(&self) -> RankTopology {
        self.topo
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }
}

/// Outcome of a complete [`run`] on one rank.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub rank: usize,
    pub steps: usize,
    pub local: LocalSum,
    pub global_mean: f64,
    /// Wall-clock time between the two barriers; only on the report rank.
    pub elapsed: Option<Duration>,
}

impl RunReport {
    pub fn local_mean(&self) -> f64 {
        self.local.mean()
    }
}

/// Run `config.steps` steps and report.
///
/// The timed region is bounded by two barriers and covers allocation,
/// seeding, every step and the reduction. Each rank writes its local mean
/// to `out`; the report rank also writes the global mean (band scope) and
/// the elapsed time.
pub fn run<T, C, W>(config: &HeatConfig, comm: &C, out: &mut W) -> Result<RunReport, HeatError>
where
    T: Cell,
    C: Communicator + ?Sized,
    W: Write,
{
    // Reject bad configurations before anyone blocks in the barrier.
    config.validate(comm.size())?;

    comm.barrier()?;
    let started = Instant::now();

    let mut solver = HeatSolver::<T, C>::new(config, comm)?;
    solver.run_steps(config.steps)?;
    let local = solver.local_sum();
    let global = global_mean(local, comm)?;
    log::debug!(
        "rank {}: sum {} over {} cells, global mean {global}",
        comm.rank(),
        local.sum,
        local.count
    );
    writeln!(out, "{}", local.mean())?;

    comm.barrier()?;
    let elapsed = started.elapsed();

    let is_reporter = comm.rank() == config.report_rank;
    if is_reporter {
        if config.reduction == ReductionScope::Band {
            writeln!(out, "global mean: {global}")?;
        }
        writeln!(out, "time: {}", elapsed.as_secs_f64())?;
        log::info!("{} steps on {} ranks in {:?}", config.steps, comm.size(), elapsed);
    }

    Ok(RunReport {
        rank: comm.rank(),
        steps: solver.steps_taken(),
        local,
        global_mean: global,
        elapsed: is_reporter.then_some(elapsed),
    })
}
