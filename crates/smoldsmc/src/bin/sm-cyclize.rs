use clap::Parser;
use anyhow::Result;
use anyhow::anyhow;
use anyhow::bail;
use colored::*;
use std::path::Path;

use sm_population::Population;
use sm_kinetics::ChainsAndRings;
use sm_kinetics::Coagulation;
use sm_kinetics::Cyclization;
use sm_kinetics::CyclizationSSA;
use sm_kinetics::GaussianChain;
use sm_kinetics::timeline::Timeline;
use sm_kinetics::timeline_plotting::plot_mean_mass_over_time;

use smoldsmc::init_logging;
use smoldsmc::acquire_seed;
use smoldsmc::warn_frozen_backward_clock;
use smoldsmc::driver::RunSettings;
use smoldsmc::driver::run_ensemble;
use smoldsmc::input_parsers::read_masses_input;
use smoldsmc::kinetics_parsers::SystemArguments;
use smoldsmc::kinetics_parsers::CyclizationParams;
use smoldsmc::kinetics_parsers::RunParameters;
use smoldsmc::kinetics_parsers::TimelineParameters;
use smoldsmc::kinetics_parsers::ResumeParams;
use smoldsmc::kinetics_parsers::OutputParameters;
use smoldsmc::output::write_summaries;

const DEFAULT_T_MAX: f64 = 1e5;

#[derive(Debug, Parser)]
#[command(name = "sm-cyclize")]
#[command(version, about = "Kinetic Monte Carlo of irreversible coagulation with ring closure")]
pub struct Cli {
    #[command(flatten, next_help_heading = "System parameters")]
    system: SystemArguments,

    #[command(flatten, next_help_heading = "Cyclization parameters")]
    cyclization: CyclizationParams,

    #[command(flatten, next_help_heading = "Run parameters")]
    run: RunParameters,

    #[command(flatten, next_help_heading = "Timeline parameters")]
    timeline: TimelineParameters,

    #[command(flatten, next_help_heading = "Resume a previous run")]
    resume: ResumeParams,

    #[command(flatten, next_help_heading = "Output")]
    output: OutputParameters,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.output.verbose);

    let t_max = cli.run.t_max_or(DEFAULT_T_MAX);
    cli.run.validate()?;
    cli.timeline.validate(t_max)?;
    cli.resume.validate(t_max)?;

    let params = cli.system.build()?;
    let rate = cli.cyclization.build()?;
    warn_frozen_backward_clock(&params, "cyclization");

    let initial = match &cli.resume.resume {
        Some(path) => {
            let chains = read_masses_input(path)?;
            let rings = match &cli.resume.resume_rings {
                Some(path) => read_masses_input(path)?,
                None => Vec::new(),
            };
            let state = ChainsAndRings::from_dumps(chains, rings, params.n_total() as u64)?;
            if state.chains.len() != params.n_total() {
                bail!("Restart dump has {} slots, expected N = {}", state.chains.len(), params.n_total());
            }
            state
        }
        None => ChainsAndRings::from(Population::monomers(params.n_total())),
    };

    let seed = acquire_seed(cli.run.seed);
    let tag = format!("ntot{}_density{:.2e}_pref{:.2}_tmax{:.2e}",
        params.n_total(), params.density(), rate.prefactor(), t_max);

    println!("{} {}", "sm-cyclize".yellow(), tag);
    println!("Output after {} simulations (seed {}): \n - {:?}\n - {:?}\n - {:?}",
        cli.run.num_sims, seed, params, cli.cyclization, cli.run);

    let template = cli.timeline.build(t_max)?;
    let times = template.times();
    let mut master = match &cli.timeline.timeline {
        Some(path) if Path::new(path).exists() => {
            println!("Loading existing timeline from: {}", path.display());
            Timeline::from_file(path, &times)?
        }
        Some(path) => {
            println!("A new timeline file will be created: {}", path.display());
            template
        }
        None => template,
    };

    let settings = RunSettings {
        t_max,
        max_steps: cli.run.max_steps,
        histogram_interval: cli.run.histogram_interval,
    };

    println!("Simulation progress:");
    let (timeline, summaries) = run_ensemble(
        cli.run.num_sims,
        seed,
        &settings,
        &cli.output.outdir,
        &tag,
        &times,
        || CyclizationSSA::from((
            initial.clone(),
            Coagulation::new(GaussianChain, params),
            Cyclization::new(rate, params),
        )).with_start_time(cli.resume.t_start),
    )?;
    master.merge(timeline);

    for s in &summaries {
        println!("{:>4} {:>12} t = {} steps = {:>10} <m> = {} new rings: {}",
            s.run,
            format!("{:?}", s.termination).green(),
            format!("{:.4e}", s.time).cyan(),
            s.steps,
            format!("{:.4e}", s.mean_mass).cyan(),
            s.backward.stats.accepted);
    }
    write_summaries(&cli.output.outdir.join(format!("summary_{}.json", tag)), &summaries)?;

    println!("Final Timeline:\n{}", master);
    if let Some(path) = &cli.timeline.plot {
        let title = format!("sm-cyclize ({} simulations)", cli.run.num_sims);
        plot_mean_mass_over_time(&[(tag.as_str(), &master)], &path.to_string_lossy(), &title)
            .map_err(|e| anyhow!("Failed to plot timeline: {}", e))?;
    }
    if let Some(path) = &cli.timeline.timeline {
        master.to_file(path)?;
    }

    Ok(())
}
