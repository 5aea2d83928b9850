use crate::config::settings::TimingSettings;

/// Where a stroke's draw happens on the shared timeline.
///
/// Times are in unscaled seconds (sums of stroke durations); percentages are
/// relative to [`Timeline::adjusted_total_time`], which includes the hold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeWindow {
    /// Position of the stroke in diagram order.
    pub index: usize,
    pub length: f64,
    pub duration: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub start_pct: f64,
    pub end_pct: f64,
}

/// Regime of a stroke at a sampled instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowPhase {
    /// Not started: fully hidden.
    Before,
    /// Being drawn; `progress` is the linear fraction of the window elapsed.
    During { progress: f64 },
    /// Completed: fully drawn.
    After,
}

impl StrokeWindow {
    /// Classify an unscaled instant against this window.
    ///
    /// A zero-length window is an instantaneous transition: an instant equal to
    /// its start reports `During` with progress 1.
    pub fn phase_at(&self, unscaled_time: f64) -> WindowPhase {
        if unscaled_time < self.start_time {
            return WindowPhase::Before;
        }
        if unscaled_time > self.end_time {
            return WindowPhase::After;
        }
        let span = self.end_time - self.start_time;
        let progress = if span > 0.0 {
            ((unscaled_time - self.start_time) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        WindowPhase::During { progress }
    }
}

/// Global schedule of one diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    pub total_length: f64,
    /// Sum of all stroke durations.
    pub total_time: f64,
    /// `total_time` stretched so the hold occupies its share of the percentages.
    pub adjusted_total_time: f64,
    /// Rescaled playback time of the strokes, without the hold.
    pub animation_time: f64,
    pub hold: f64,
    pub windows: Vec<StrokeWindow>,
}

impl Timeline {
    /// Build the schedule from stroke lengths given in diagram order.
    pub fn allocate(lengths: &[f64], timing: &TimingSettings) -> Self {
        let durations: Vec<f64> = lengths
            .iter()
            .map(|&len| timing.duration.duration(len))
            .collect();

        let total_length: f64 = lengths.iter().sum();
        let total_time: f64 = durations.iter().sum();

        let animation_time = if total_time > 0.0 {
            timing.rescale.rescale(total_time)
        } else {
            0.0
        };
        let adjusted_total_time = if animation_time > 0.0 {
            total_time + timing.hold * total_time / animation_time
        } else {
            total_time
        };

        let pct = |t: f64| {
            if adjusted_total_time > 0.0 {
                t / adjusted_total_time * 100.0
            } else {
                0.0
            }
        };

        let mut elapsed = 0.0;
        let windows = lengths
            .iter()
            .zip(&durations)
            .enumerate()
            .map(|(index, (&length, &duration))| {
                let start_time = elapsed;
                elapsed += duration;
                StrokeWindow {
                    index,
                    length,
                    duration,
                    start_time,
                    end_time: elapsed,
                    start_pct: pct(start_time),
                    end_pct: pct(elapsed),
                }
            })
            .collect();

        Self {
            total_length,
            total_time,
            adjusted_total_time,
            animation_time,
            hold: timing.hold,
            windows,
        }
    }

    /// Full animation period: rescaled stroke time plus the hold.
    pub fn period(&self) -> f64 {
        self.animation_time + self.hold
    }

    /// Convert a playback instant (seconds) into unscaled timeline time.
    pub fn to_unscaled(&self, playback_time: f64) -> f64 {
        let period = self.period();
        if period > 0.0 {
            playback_time * self.adjusted_total_time / period
        } else {
            0.0
        }
    }

    /// Per-stroke duration used when strokes are triggered one by one.
    pub fn relative_duration(&self, window: &StrokeWindow) -> f64 {
        self.to_unscaled(window.duration)
    }

    pub fn stroke_count(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/allocator.rs"]
mod tests;
