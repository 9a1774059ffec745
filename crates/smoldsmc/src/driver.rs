use std::io;
use std::path::Path;
use std::ops::ControlFlow;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use sm_kinetics::Channel;
use sm_kinetics::MassHistogram;
use sm_kinetics::StepReport;
use sm_kinetics::Termination;
use sm_kinetics::ThinningSSA;
use sm_kinetics::timeline::Timeline;
use sm_kinetics::timeline::TimelineRecorder;

use crate::output::is_histogram_step;
use crate::output::ChannelSummary;
use crate::output::Recordable;
use crate::output::RunOutput;
use crate::output::RunSummary;
use crate::progress_bar;

/// Stop conditions and output cadence shared by all runs.
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub t_max: f64,
    pub max_steps: Option<u64>,
    pub histogram_interval: u64,
}

/// Write everything a completed step asks for: the time series after
/// accepted events and a histogram every `histogram_interval` steps.
fn record_step<S, CA, CB>(
    report: &StepReport<CA, CB>,
    state: &S,
    settings: &RunSettings,
    output: &mut RunOutput,
    recorder: &mut TimelineRecorder<'_>,
) -> io::Result<()>
where
    S: Recordable,
{
    if report.outcome.is_accepted() {
        recorder.update(report.time, state.mean_mass());
        S::write_record(&state.observe(report.time), output)?;
    }
    if is_histogram_step(report.step, settings.histogram_interval) {
        let histogram = MassHistogram::new(report.step, report.time, state.chains());
        output.write_histogram(&histogram)?;
    }
    Ok(())
}

/// Run one simulation with its own seeded generator, streaming its
/// output and sampling its mean mass into `timeline`.
pub fn run_simulation<S, A, B>(
    mut ssa: ThinningSSA<S, A, B>,
    run: usize,
    seed: u64,
    settings: &RunSettings,
    mut output: RunOutput,
    timeline: &mut Timeline,
) -> io::Result<RunSummary>
where
    S: Recordable,
    A: Channel<S>,
    B: Channel<S>,
{
    if settings.histogram_interval == 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "histogram interval must be positive"));
    }
    info!("Run {} ({}) starts at t = {:.4e} with seed {}", run, output.tag(), ssa.time(), seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut recorder = timeline.recorder(ssa.time(), ssa.state().mean_mass());
    let mut failure = None;

    let termination = ssa.simulate(&mut rng, settings.t_max, |report, state| {
        if let Err(e) = record_step(report, state, settings, &mut output, &mut recorder) {
            failure = Some(e);
            return ControlFlow::Break(());
        }
        if settings.max_steps.is_some_and(|max| report.step + 1 >= max) {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    if let Some(e) = failure {
        return Err(e);
    }

    // A halted or exhausted state stays as it is until t_max.
    let until = match termination {
        Termination::Halted | Termination::Exhausted => settings.t_max,
        Termination::TimeLimit | Termination::Interrupted => ssa.time(),
    };
    recorder.finish(until);

    let restart = ssa.state().write_restart(&output, ssa.time())?;
    output.finish()?;
    info!("Run {} terminated ({:?}) at t = {:.4e} after {} steps", run, termination, ssa.time(), ssa.steps());

    Ok(RunSummary {
        run,
        seed,
        termination,
        time: ssa.time(),
        steps: ssa.steps(),
        mean_mass: ssa.state().mean_mass(),
        forward: ChannelSummary {
            name: ssa.forward().channel().name(),
            bound: ssa.forward().bound(),
            stats: *ssa.forward().stats(),
        },
        backward: ChannelSummary {
            name: ssa.backward().channel().name(),
            bound: ssa.backward().bound(),
            stats: *ssa.backward().stats(),
        },
        restart,
    })
}

/// Run `num_sims` independent simulations in parallel, run `i` seeded
/// with `seed + i`. Returns the merged timeline of all runs and their
/// summaries in run order.
pub fn run_ensemble<S, A, B, F>(
    num_sims: usize,
    seed: u64,
    settings: &RunSettings,
    outdir: &Path,
    tag: &str,
    times: &[f64],
    build: F,
) -> io::Result<(Timeline, Vec<RunSummary>)>
where
    S: Recordable,
    A: Channel<S>,
    B: Channel<S>,
    F: Fn() -> ThinningSSA<S, A, B> + Sync + Send,
{
    let pb = progress_bar(num_sims);
    let results: Vec<(Timeline, RunSummary)> = (0..num_sims)
        .into_par_iter()
        .map_init(
            || pb.clone(),
            |pb, i| -> io::Result<(Timeline, RunSummary)> {
                let run_tag = if num_sims > 1 {
                    format!("{}_run{}", tag, i)
                } else {
                    tag.to_string()
                };
                let output = RunOutput::create(outdir, &run_tag, S::WITH_COUNTS)?;
                let mut timeline = Timeline::new(times);
                let seed = seed.wrapping_add(i as u64);
                let summary = run_simulation(build(), i, seed, settings, output, &mut timeline)?;
                pb.inc(1);
                Ok((timeline, summary))
            },
        )
        .collect::<io::Result<_>>()?;
    pb.finish_with_message("All simulations complete!");

    let mut merged = Timeline::new(times);
    let mut summaries = Vec::with_capacity(num_sims);
    for (timeline, summary) in results {
        merged.merge(timeline);
        summaries.push(summary);
    }
    Ok((merged, summaries))
}
