use std::fmt;
use std::error::Error;
use serde::{Serialize, Deserialize};

#[derive(Debug)]
pub enum TimelineError {
    Io(std::io::Error),
    Json(serde_json::Error),
    TimepointCountMismatch { found: usize, expected: usize },
    TimeMismatch { file_time: f64, expected_time: f64 },
    InvalidTimes,
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Json(e) => write!(f, "JSON parse error: {}", e),
            Self::TimepointCountMismatch { found, expected } =>
                write!(f, "Timeline file has {found} timepoints, expected {expected}"),
            Self::TimeMismatch { file_time, expected_time } =>
                write!(f, "Time mismatch: {file_time} vs {expected_time}"),
            Self::InvalidTimes =>
                write!(f, "Timeline requires 0 < t_min < t_max and at least one point"),
        }
    }
}

impl Error for TimelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TimelineError {
    fn from(e: std::io::Error) -> Self { Self::Io(e) }
}

impl From<serde_json::Error> for TimelineError {
    fn from(e: serde_json::Error) -> Self { Self::Json(e) }
}

/// Mean-mass samples of many runs at one output time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timepoint {
    pub time: f64,
    pub sum: f64,
    pub sum_sq: f64,
    /// Number of runs that reached this time.
    pub counter: usize,
}

impl Timepoint {
    pub fn new(time: f64) -> Self {
        Self { time, sum: 0.0, sum_sq: 0.0, counter: 0 }
    }

    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.sum_sq += value * value;
        self.counter += 1;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.counter > 0).then(|| self.sum / self.counter as f64)
    }

    /// Population standard deviation over runs.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let var = self.sum_sq / self.counter as f64 - mean * mean;
        Some(var.max(0.0).sqrt())
    }
}

/// The mean mass of an ensemble of runs at fixed output times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub points: Vec<Timepoint>,
}

impl Timeline {
    pub fn new(times: &[f64]) -> Self {
        Self { points: times.iter().map(|&t| Timepoint::new(t)).collect() }
    }

    /// `per_decade` logarithmically spaced output times from `t_min` up
    /// to and including `t_max`.
    pub fn log_spaced(t_min: f64, t_max: f64, per_decade: usize) -> Result<Self, TimelineError> {
        if !(t_min > 0.0 && t_max > t_min && t_max.is_finite()) || per_decade == 0 {
            return Err(TimelineError::InvalidTimes);
        }
        let decades = (t_max / t_min).log10();
        // t_max itself is appended below
        let n = (decades * per_decade as f64 - 1e-9).ceil() as usize;
        let mut times: Vec<f64> = (0..n)
            .map(|i| t_min * 10f64.powf(i as f64 / per_decade as f64))
            .collect();
        times.push(t_max);
        Ok(Self::new(&times))
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|tp| tp.time).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Start recording a run whose observable is `initial` at `t_start`.
    pub fn recorder(&mut self, t_start: f64, initial: f64) -> TimelineRecorder<'_> {
        let next = self.points.iter().take_while(|tp| tp.time < t_start).count();
        TimelineRecorder { timeline: self, next, current: initial }
    }

    pub fn merge(&mut self, other: Timeline) {
        assert_eq!(self.points.len(), other.points.len(),
            "Cannot merge timelines with different numbers of timepoints");
        for (tp, other_tp) in self.points.iter_mut().zip(other.points) {
            tp.sum += other_tp.sum;
            tp.sum_sq += other_tp.sum_sq;
            tp.counter += other_tp.counter;
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>12} {:>12} {:>8}", "time", "mean_mass", "std_dev", "runs")?;
        for tp in &self.points {
            if let (Some(mean), Some(std)) = (tp.mean(), tp.std_dev()) {
                writeln!(f, "{:12.4e} {:12.4e} {:12.4e} {:8}", tp.time, mean, std, tp.counter)?;
            }
        }
        Ok(())
    }
}

/// Samples one run into a [`Timeline`]. The observable is piecewise
/// constant between events, so every output time passed by an event is
/// assigned the value from before that event.
#[derive(Debug)]
pub struct TimelineRecorder<'a> {
    timeline: &'a mut Timeline,
    next: usize,
    current: f64,
}

impl TimelineRecorder<'_> {
    /// An event at `time` changed the observable to `value`.
    pub fn update(&mut self, time: f64, value: f64) {
        while let Some(tp) = self.timeline.points.get_mut(self.next) {
            if tp.time >= time {
                break;
            }
            tp.add(self.current);
            self.next += 1;
        }
        self.current = value;
    }

    /// Assign the final value to all output times up to `until`.
    pub fn finish(mut self, until: f64) {
        while let Some(tp) = self.timeline.points.get_mut(self.next) {
            if tp.time > until {
                break;
            }
            tp.add(self.current);
            self.next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_spaced() {
        let tl = Timeline::log_spaced(0.1, 100.0, 2).unwrap();
        let times = tl.times();
        assert_eq!(times.len(), 7);
        assert_eq!(times[0], 0.1);
        assert_eq!(times[6], 100.0);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert!(Timeline::log_spaced(0.0, 1.0, 2).is_err());
        assert!(Timeline::log_spaced(2.0, 1.0, 2).is_err());
    }

    #[test]
    fn test_recorder_assigns_value_before_event() {
        let mut tl = Timeline::new(&[1.0, 2.0, 3.0, 4.0]);
        let mut rec = tl.recorder(0.0, 1.0);
        rec.update(0.5, 2.0);
        rec.update(2.5, 5.0);
        rec.finish(3.5);
        let means: Vec<_> = tl.points.iter().map(|tp| tp.mean()).collect();
        assert_eq!(means, vec![Some(2.0), Some(2.0), Some(5.0), None]);
    }

    #[test]
    fn test_recorder_skips_times_before_start() {
        let mut tl = Timeline::new(&[1.0, 2.0, 3.0]);
        let rec = tl.recorder(1.5, 4.0);
        rec.finish(f64::INFINITY);
        assert_eq!(tl.points[0].counter, 0);
        assert_eq!(tl.points[1].mean(), Some(4.0));
        assert_eq!(tl.points[2].mean(), Some(4.0));
    }

    #[test]
    fn test_merge_timelines() {
        let mut a = Timeline::new(&[1.0, 2.0]);
        let mut b = Timeline::new(&[1.0, 2.0]);
        a.recorder(0.0, 2.0).finish(2.0);
        b.recorder(0.0, 4.0).finish(1.0);
        a.merge(b);
        assert_eq!(a.points[0].mean(), Some(3.0));
        assert_eq!(a.points[0].std_dev(), Some(1.0));
        assert_eq!(a.points[1].counter, 1);
        assert_eq!(a.points[1].mean(), Some(2.0));
    }
}
