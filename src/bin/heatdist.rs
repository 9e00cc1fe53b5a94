//! heatdist command-line driver.
//!
//! ```sh
//! heatdist --n 1024 --steps 30720                # one rank
//! heatdist --ranks 4 --halo ghost                # four ranks as threads
//! mpirun -n 4 heatdist --mpi --config run.toml   # four MPI processes
//! ```
//!
//! Log output goes through `env_logger`; set `RUST_LOG=heatdist=debug` to
//! see per-rank reduction values.

use anyhow::Context;
use clap::Parser;
use heatdist::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heatdist")]
#[command(about = "Distributed 2D heat-diffusion stencil solver")]
#[command(version)]
struct Cli {
    /// TOML configuration file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Grid side length N.
    #[arg(long)]
    n: Option<usize>,
    /// Number of diffusion steps T.
    #[arg(short = 't', long)]
    steps: Option<usize>,
    /// Ranks to run as threads of this process.
    #[arg(short = 'r', long, default_value_t = 1)]
    ranks: usize,
    /// Rank that prints the elapsed time.
    #[arg(long)]
    report_rank: Option<usize>,
    /// `in-band` or `ghost`.
    #[arg(long)]
    halo: Option<HaloLayout>,
    /// `band` or `full-grid`.
    #[arg(long)]
    reduction: Option<ReductionScope>,
    /// `quartic` or `zero`.
    #[arg(long)]
    seed: Option<Seed>,
    /// `f32` or `f64`.
    #[arg(long)]
    precision: Option<Precision>,
    /// Use the MPI world communicator instead of a thread group.
    #[cfg(feature = "mpi-support")]
    #[arg(long)]
    mpi: bool,
}

impl Cli {
    fn resolve(&self) -> anyhow::Result<HeatConfig> {
        let mut cfg = match &self.config {
            Some(path) => HeatConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => HeatConfig::default(),
        };
        if let Some(n) = self.n {
            cfg.n = n;
        }
        if let Some(steps) = self.steps {
            cfg.steps = steps;
        }
        if let Some(r) = self.report_rank {
            cfg.report_rank = r;
        }
        if let Some(h) = self.halo {
            cfg.halo = h;
        }
        if let Some(s) = self.reduction {
            cfg.reduction = s;
        }
        if let Some(s) = self.seed {
            cfg.seed = s;
        }
        if let Some(p) = self.precision {
            cfg.precision = p;
        }
        Ok(cfg)
    }
}

fn run_rank<C: Communicator + ?Sized>(cfg: &HeatConfig, comm: &C) -> anyhow::Result<RunReport> {
    // Unlocked handle: ranks sharing this process interleave whole lines.
    let mut out = std::io::stdout();
    let report = match cfg.precision {
        Precision::F32 => run::<f32, _, _>(cfg, comm, &mut out),
        Precision::F64 => run::<f64, _, _>(cfg, comm, &mut out),
    }
    .with_context(|| format!("rank {} of {}", comm.rank(), comm.size()))?;
    Ok(report)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = cli.resolve()?;

    #[cfg(feature = "mpi-support")]
    if cli.mpi {
        let comm = MpiComm::new()?;
        run_rank(&cfg, &comm)?;
        return Ok(());
    }

    cfg.validate(cli.ranks)
        .with_context(|| format!("invalid configuration for {} ranks", cli.ranks))?;
    if cli.ranks == 1 {
        run_rank(&cfg, &NoComm)?;
        return Ok(());
    }
    LocalComm::run_group(cli.ranks, |comm| run_rank(&cfg, &comm))
        .into_iter()
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(())
}
