use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use serde::Serialize;

use sm_population::Population;
use sm_kinetics::ChainsAndRings;
use sm_kinetics::ChannelStats;
use sm_kinetics::CyclizationRecord;
use sm_kinetics::FragmentationRecord;
use sm_kinetics::MassHistogram;
use sm_kinetics::Observe;
use sm_kinetics::SimulationState;
use sm_kinetics::Termination;

/// Histograms are taken after steps 0, k, 2k, ...
pub fn is_histogram_step(step: u64, interval: u64) -> bool {
    step % interval == 0
}

/// The files written by one run: the time series, the histogram
/// directory and the final restart dumps, all named after `tag`.
#[derive(Debug)]
pub struct RunOutput {
    outdir: PathBuf,
    tag: String,
    histograms: PathBuf,
    series: BufWriter<File>,
    counts: Option<BufWriter<File>>,
}

impl RunOutput {
    /// Create the output directory and the time series of a run. The
    /// molecule count series is only opened if `with_counts` is set.
    pub fn create(outdir: &Path, tag: &str, with_counts: bool) -> io::Result<Self> {
        let histograms = outdir.join(format!("histograms_{}", tag));
        fs::create_dir_all(&histograms)?;

        let series = File::create(outdir.join(format!("mav_vs_t_{}.dat", tag)))?;
        let counts = if with_counts {
            let file = File::create(outdir.join(format!("nchain_rings_{}.dat", tag)))?;
            Some(BufWriter::new(file))
        } else {
            None
        };
        Ok(Self {
            outdir: outdir.to_path_buf(),
            tag: tag.to_string(),
            histograms,
            series: BufWriter::new(series),
            counts,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn write_histogram(&self, histogram: &MassHistogram) -> io::Result<PathBuf> {
        let path = self.histograms.join(
            format!("n{:010}_t{:.3e}", histogram.step, histogram.time));
        fs::write(&path, histogram.to_string())?;
        Ok(path)
    }

    /// Write a final dump, e.g. `masses_final_<tag>_t1.000e4.dat`.
    pub fn write_dump<D: ToString>(&self, prefix: &str, time: f64, dump: &D) -> io::Result<PathBuf> {
        let path = self.outdir.join(format!("{}_final_{}_t{:.3e}.dat", prefix, self.tag, time));
        fs::write(&path, dump.to_string())?;
        Ok(path)
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.series.flush()?;
        if let Some(counts) = self.counts.as_mut() {
            counts.flush()?;
        }
        Ok(())
    }
}

/// A simulation state whose runs can be written to a [`RunOutput`].
pub trait Recordable: SimulationState + Observe {
    /// Whether runs on this state write a molecule count series.
    const WITH_COUNTS: bool;

    fn write_record(record: &Self::Record, output: &mut RunOutput) -> io::Result<()>;

    fn write_restart(&self, output: &RunOutput, time: f64) -> io::Result<Vec<PathBuf>>;
}

impl Recordable for Population {
    const WITH_COUNTS: bool = false;

    fn write_record(record: &FragmentationRecord, output: &mut RunOutput) -> io::Result<()> {
        writeln!(output.series, "{}", record)
    }

    fn write_restart(&self, output: &RunOutput, time: f64) -> io::Result<Vec<PathBuf>> {
        Ok(vec![output.write_dump("masses", time, self)?])
    }
}

impl Recordable for ChainsAndRings {
    const WITH_COUNTS: bool = true;

    fn write_record(record: &CyclizationRecord, output: &mut RunOutput) -> io::Result<()> {
        writeln!(output.series, "{}", record)?;
        if let Some(counts) = output.counts.as_mut() {
            writeln!(counts, "{}", record.counts())?;
        }
        Ok(())
    }

    fn write_restart(&self, output: &RunOutput, time: f64) -> io::Result<Vec<PathBuf>> {
        Ok(vec![
            output.write_dump("masses", time, &self.chains)?,
            output.write_dump("rings", time, &self.rings)?,
        ])
    }
}

/// What a run did, for the JSON summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run: usize,
    pub seed: u64,
    pub termination: Termination,
    pub time: f64,
    pub steps: u64,
    pub mean_mass: f64,
    pub forward: ChannelSummary,
    pub backward: ChannelSummary,
    pub restart: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub name: &'static str,
    pub bound: f64,
    pub stats: ChannelStats,
}

pub fn write_summaries(path: &Path, summaries: &[RunSummary]) -> io::Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, summaries)?;
    Ok(())
}
