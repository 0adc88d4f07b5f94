//! Dual-timeline frame timing with exponentially smoothed averages.
//!
//! The host submits frames on one timeline while the device executes them on
//! another, so each side gets its own [`Timeline`]. The submission timeline
//! is ticked synchronously at the top of every frame; the execution timeline
//! lives behind an `Arc<Mutex<_>>` so a queue completion callback can tick it
//! from whatever thread the driver invokes it on.

use std::sync::{Arc, Mutex};

use web_time::Instant;

/// Weight of the newest sample in the exponential moving average.
const SMOOTHING: f32 = 0.05;

/// Number of frames between periodic reports on a timeline.
const REPORT_INTERVAL: u64 = 6;

/// Periodic summary of one timeline's smoothed frame time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineReport {
    /// Smoothed frame time in milliseconds.
    pub avg_ms: f32,
    /// Estimated frames per second, rounded to the nearest integer.
    pub fps: u32,
    /// Total frames folded into the timeline so far.
    pub frames: u64,
}

/// One exponentially smoothed frame-time series.
///
/// The average starts at zero and converges toward the true frame time as
/// samples accumulate; a report is surfaced every [`REPORT_INTERVAL`] frames.
#[derive(Debug)]
pub struct Timeline {
    last: Instant,
    avg: f32,
    frames: u64,
}

impl Timeline {
    /// Create a timeline anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            avg: 0.0,
            frames: 0,
        }
    }

    /// Fold a frame delta (in seconds) into the smoothed average.
    ///
    /// Returns a [`TimelineReport`] on every [`REPORT_INTERVAL`]th frame,
    /// `None` otherwise. A non-positive average suppresses the report so the
    /// FPS estimate never divides by zero.
    pub fn advance(&mut self, dt: f32) -> Option<TimelineReport> {
        self.avg = self.avg * (1.0 - SMOOTHING) + dt * SMOOTHING;
        self.frames += 1;

        if self.frames % REPORT_INTERVAL != 0 || self.avg <= 0.0 {
            return None;
        }
        Some(TimelineReport {
            avg_ms: self.avg * 1000.0,
            fps: (1.0 / self.avg).round() as u32,
            frames: self.frames,
        })
    }

    /// Sample the monotonic clock and fold the elapsed time since the
    /// previous tick into the average.
    pub fn tick(&mut self) -> Option<TimelineReport> {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.advance(dt)
    }

    /// Current smoothed frame time in seconds.
    #[must_use]
    pub fn average(&self) -> f32 {
        self.avg
    }

    /// Total frames folded into this timeline.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Independent clocks for the submission and execution timelines.
pub struct FrameClock {
    submission: Timeline,
    execution: Arc<Mutex<Timeline>>,
}

impl FrameClock {
    /// Create both timelines anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            submission: Timeline::new(),
            execution: Arc::new(Mutex::new(Timeline::new())),
        }
    }

    /// Tick the submission timeline. Call once per frame, before recording.
    pub fn tick_submission(&mut self) -> Option<TimelineReport> {
        self.submission.tick()
    }

    /// Frames submitted so far; drives the per-frame color cycle.
    #[must_use]
    pub fn submission_frames(&self) -> u64 {
        self.submission.frames()
    }

    /// Smoothed submission-side frame time in seconds.
    #[must_use]
    pub fn submission_average(&self) -> f32 {
        self.submission.average()
    }

    /// Shared handle to the execution timeline for completion callbacks.
    #[must_use]
    pub fn execution_handle(&self) -> Arc<Mutex<Timeline>> {
        Arc::clone(&self.execution)
    }

    /// Snapshot of the execution-side smoothed frame time in seconds.
    /// Returns `None` if the timeline mutex has been poisoned.
    #[must_use]
    pub fn execution_average(&self) -> Option<f32> {
        self.execution.lock().ok().map(|timeline| timeline.average())
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_weighted_by_smoothing() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.advance(0.016), None);
        assert!((timeline.average() - 0.016 * SMOOTHING).abs() < 1e-7);
        assert_eq!(timeline.frames(), 1);
    }

    #[test]
    fn test_average_converges_toward_steady_input() {
        let mut timeline = Timeline::new();
        for _ in 0..600 {
            let _ = timeline.advance(0.010);
        }
        assert!((timeline.average() - 0.010).abs() < 1e-4);
    }

    #[test]
    fn test_report_cadence_every_sixth_frame() {
        let mut timeline = Timeline::new();
        for frame in 1..=24u64 {
            let report = timeline.advance(0.004);
            if frame % REPORT_INTERVAL == 0 {
                let report = report.unwrap();
                assert_eq!(report.frames, frame);
                assert!(report.avg_ms > 0.0);
            } else {
                assert_eq!(report, None);
            }
        }
    }

    #[test]
    fn test_report_values_match_average() {
        let mut timeline = Timeline::new();
        let mut last_report = None;
        for _ in 0..REPORT_INTERVAL {
            last_report = timeline.advance(0.020);
        }
        let report = last_report.unwrap();
        assert!((report.avg_ms - timeline.average() * 1000.0).abs() < 1e-4);
        let expected_fps = (1.0 / timeline.average()).round() as u32;
        assert_eq!(report.fps, expected_fps);
    }

    #[test]
    fn test_zero_average_suppresses_report() {
        let mut timeline = Timeline::new();
        for _ in 0..REPORT_INTERVAL {
            assert_eq!(timeline.advance(0.0), None);
        }
        assert_eq!(timeline.frames(), REPORT_INTERVAL);
    }

    #[test]
    fn test_timelines_are_independent() {
        let mut clock = FrameClock::new();
        let _ = clock.tick_submission();
        let _ = clock.tick_submission();
        assert_eq!(clock.submission_frames(), 2);

        let execution = clock.execution_handle();
        {
            let mut timeline = execution.lock().unwrap();
            let _ = timeline.advance(0.008);
        }
        assert_eq!(clock.submission_frames(), 2);
        assert!(clock.submission_average() >= 0.0);
        assert!((clock.execution_average().unwrap() - 0.008 * SMOOTHING).abs() < 1e-7);
    }

    #[test]
    fn test_execution_handle_shares_state() {
        let clock = FrameClock::new();
        let a = clock.execution_handle();
        let b = clock.execution_handle();
        {
            let mut timeline = a.lock().unwrap();
            let _ = timeline.advance(0.030);
        }
        assert_eq!(b.lock().unwrap().frames(), 1);
    }
}
