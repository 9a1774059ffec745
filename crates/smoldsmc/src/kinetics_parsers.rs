use std::path::PathBuf;
use clap::Args;
use clap::ArgAction;
use anyhow::Result;
use anyhow::bail;

use sm_kinetics::SystemParameters;
use sm_kinetics::DetailedBalance;
use sm_kinetics::CyclizationRate;
use sm_kinetics::InverseMass;
use sm_kinetics::timeline::Timeline;

#[derive(Debug, Args)]
pub struct SystemArguments {
    /// Total number of monomers (N), also the number of slots.
    #[arg(short = 'N', long, default_value_t = 10000)]
    pub n_total: usize,

    /// Monomer density.
    #[arg(long, default_value_t = 0.1)]
    pub density: f64,

    /// Share of the clock advanced by merge events, in [0,1].
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,
}

impl SystemArguments {
    pub fn build(&self) -> Result<SystemParameters> {
        Ok(SystemParameters::new(self.n_total, self.density, self.alpha)?)
    }
}

#[derive(Debug, Args)]
pub struct FragmentationParams {
    /// Dissociation constant, in [0,1].
    #[arg(long = "k-d", default_value_t = 1e-3)]
    pub k_d: f64,
}

impl FragmentationParams {
    pub fn build(&self) -> Result<DetailedBalance<InverseMass>> {
        Ok(DetailedBalance::new(InverseMass, self.k_d)?)
    }
}

#[derive(Debug, Args)]
pub struct CyclizationParams {
    /// Prefactor of the cyclization rate pref * m^-1.5 (must be > 0).
    #[arg(long)]
    pub ring_prefactor: f64,
}

impl CyclizationParams {
    pub fn build(&self) -> Result<CyclizationRate> {
        Ok(CyclizationRate::new(self.ring_prefactor)?)
    }
}

#[derive(Debug, Args)]
pub struct RunParameters {
    /// Simulation stop time [default: 1e4 with fragmentation, 1e5 with cyclization]
    #[arg(long)]
    pub t_max: Option<f64>,

    /// Seed of the first run, run i uses seed + i [default: random]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a mass histogram every this many steps.
    #[arg(long, default_value_t = 10000)]
    pub histogram_interval: u64,

    /// Stop a run after this many steps, regardless of time.
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Number of independent runs.
    #[arg(short, long, default_value_t = 1)]
    pub num_sims: usize,
}

impl RunParameters {
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.t_max {
            if !(t > 0.0) {
                bail!("t_max must be positive (got {})", t);
            }
        }
        if self.histogram_interval == 0 {
            bail!("histogram_interval must be at least 1");
        }
        if self.max_steps == Some(0) {
            bail!("max_steps must be at least 1");
        }
        if self.num_sims == 0 {
            bail!("num_sims must be at least 1");
        }
        Ok(())
    }

    pub fn t_max_or(&self, default: f64) -> f64 {
        self.t_max.unwrap_or(default)
    }
}

#[derive(Debug, Args)]
pub struct TimelineParameters {
    /// First output time of the logarithmic timeline.
    #[arg(long, default_value_t = 1e-2)]
    pub t_min: f64,

    /// Number of output times per decade.
    #[arg(long, default_value_t = 10)]
    pub per_decade: usize,

    /// Backup/Store the ensemble timeline in this file.
    #[arg(long, value_name = "FILE")]
    pub timeline: Option<PathBuf>,

    /// Plot the mean mass over time to this SVG file.
    #[arg(long, value_name = "FILE")]
    pub plot: Option<PathBuf>,
}

impl TimelineParameters {
    pub fn validate(&self, t_max: f64) -> Result<()> {
        if !(self.t_min > 0.0) {
            bail!("t_min must be positive (got {})", self.t_min);
        }
        if t_max <= self.t_min {
            bail!("t_max ({}) must be greater than t_min ({})", t_max, self.t_min);
        }
        if self.per_decade == 0 {
            bail!("per_decade must be at least 1");
        }
        Ok(())
    }

    pub fn build(&self, t_max: f64) -> Result<Timeline> {
        Ok(Timeline::log_spaced(self.t_min, t_max, self.per_decade)?)
    }
}

#[derive(Debug, Args)]
pub struct ResumeParams {
    /// Restart dump of a previous run (one mass per slot), or "-" for stdin.
    #[arg(long, value_name = "FILE")]
    pub resume: Option<String>,

    /// Restart dump of the rings of a previous run.
    #[arg(long, value_name = "FILE", requires = "resume")]
    pub resume_rings: Option<String>,

    /// Elapsed time of the run to resume.
    #[arg(long, default_value_t = 0.0, requires = "resume")]
    pub t_start: f64,
}

impl ResumeParams {
    pub fn validate(&self, t_max: f64) -> Result<()> {
        if !(self.t_start >= 0.0 && self.t_start.is_finite()) {
            bail!("t_start must be a non-negative number (got {})", self.t_start);
        }
        if self.t_start >= t_max {
            bail!("t_start ({}) must be smaller than t_max ({})", self.t_start, t_max);
        }
        if self.resume.as_deref() == Some("-") && self.resume_rings.as_deref() == Some("-") {
            bail!("Only one restart dump can be read from stdin");
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct OutputParameters {
    /// Directory for time series, histograms and restart dumps.
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
