use std::fs;
use std::path::Path;

use crate::timeline::Timeline;
use crate::timeline::TimelineError;

impl Timeline {
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TimelineError> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Load a timeline from a JSON file, checking that it was sampled at
    /// the provided output times.
    pub fn from_file<P: AsRef<Path>>(path: P, times: &[f64]) -> Result<Self, TimelineError> {
        let data = fs::read_to_string(path)?;
        let timeline: Timeline = serde_json::from_str(&data)?;

        if timeline.points.len() != times.len() {
            return Err(TimelineError::TimepointCountMismatch {
                found: timeline.points.len(),
                expected: times.len(),
            });
        }
        for (tp, &time) in timeline.points.iter().zip(times) {
            if (tp.time - time).abs() > 1e-9 * time.abs().max(1.0) {
                return Err(TimelineError::TimeMismatch {
                    file_time: tp.time,
                    expected_time: time,
                });
            }
        }
        Ok(timeline)
    }
}
