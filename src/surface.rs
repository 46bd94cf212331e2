use std::time::{Duration, Instant};

/// Drawing primitives the particle field renders through.
///
/// Coordinates are logical units; implementations apply their own pixel ratio.
pub trait DrawSurface {
    /// Set the logical size and the number of device units per logical unit
    fn set_size(&mut self, width: f32, height: f32, pixel_ratio: f32);

    /// Erase the whole surface
    fn clear(&mut self);

    /// Filled circle, optionally surrounded by a halo `glow` units wide
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, opacity: f32, glow: f32);

    /// Single character centred on (x, y)
    fn draw_glyph(&mut self, x: f32, y: f32, glyph: char, opacity: f32);

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, opacity: f32);
}

/// Something that will call back once before the next repaint
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Single-slot frame scheduler driven by the host loop.
///
/// Holds at most one outstanding request; requesting again while one is
/// pending is a no-op.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: bool,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) {
        self.pending = true;
    }
}

/// Wall-clock pacing so scheduled frames run at most once per interval,
/// however often the host loop wakes up for input.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    last: Option<Instant>,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True once per interval; the first call is always due
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// How long the host can wait for input before the next frame is due
    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_holds_one_request() {
        let mut queue = FrameQueue::new();
        assert!(!queue.take());

        queue.request_frame();
        queue.request_frame();
        assert!(queue.is_pending());
        assert!(queue.take());
        assert!(!queue.take());
    }

    #[test]
    fn test_pacer_runs_once_per_interval() {
        let interval = Duration::from_millis(16);
        let mut pacer = FramePacer::new(interval);
        let start = Instant::now();

        assert_eq!(pacer.time_until_due(start), Duration::ZERO);
        assert!(pacer.due(start));

        // A burst of input events inside one frame runs no extra frames
        let mut ran = 0;
        for ms in 1..16 {
            if pacer.due(start + Duration::from_millis(ms)) {
                ran += 1;
            }
        }
        assert_eq!(ran, 0);
        assert_eq!(
            pacer.time_until_due(start + Duration::from_millis(10)),
            Duration::from_millis(6)
        );

        assert!(pacer.due(start + interval));
        assert!(!pacer.due(start + interval + Duration::from_millis(1)));
        assert_eq!(pacer.time_until_due(start + interval * 3), Duration::ZERO);
    }
}
