use crate::foundation::error::{KanimateError, KanimateResult};
use crate::timeline::allocator::Timeline;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// One sampled instant of the raster animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub index: FrameIndex,
    /// Playback time of the sample, in seconds.
    pub time: f64,
    /// How long the frame stays on screen, in seconds.
    pub delay: f64,
}

impl Frame {
    /// Delay in GIF units (hundredths of a second), truncated.
    ///
    /// Delays a rounding error below a whole unit (`0.29 * 100`) count as that unit.
    pub fn delay_centis(&self) -> u32 {
        (self.delay * 100.0 + 1e-9).max(0.0) as u32
    }
}

/// Regular samples of the stroke animation plus one closing sample.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSchedule {
    pub frame_duration: f64,
    /// Index of the last regularly spaced sample.
    pub last_frame_index: u64,
    pub frames: Vec<Frame>,
}

impl FrameSchedule {
    /// Sample `[0, animation_time]` every `frame_duration` seconds.
    ///
    /// Frames `0..=last_frame_index` sit at `k * frame_duration`, with
    /// `last_frame_index = floor(animation_time / frame_duration) + 1` so the final
    /// regular sample is past the end of the strokes. A closing frame at
    /// `period` shows the completed diagram for the rest of the period.
    /// The delays add up to `period + frame_duration`, so one loop of the
    /// raster output is one frame longer than the vector animation period.
    pub fn sample(animation_time: f64, period: f64, frame_duration: f64) -> KanimateResult<Self> {
        if !(frame_duration.is_finite() && frame_duration > 0.0) {
            return Err(KanimateError::configuration(
                "frame duration must be positive",
            ));
        }
        let last_frame_index = (animation_time.max(0.0) / frame_duration).floor() as u64 + 1;

        let mut frames: Vec<Frame> = (0..=last_frame_index)
            .map(|k| Frame {
                index: FrameIndex(k),
                time: k as f64 * frame_duration,
                delay: frame_duration,
            })
            .collect();
        frames.push(Frame {
            index: FrameIndex(last_frame_index + 1),
            time: period,
            delay: (period - last_frame_index as f64 * frame_duration).max(0.0),
        });

        Ok(Self {
            frame_duration,
            last_frame_index,
            frames,
        })
    }

    pub fn for_timeline(timeline: &Timeline, frame_duration: f64) -> KanimateResult<Self> {
        Self::sample(timeline.animation_time, timeline.period(), frame_duration)
    }

    pub fn closing_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/frames.rs"]
mod tests;
