//! Featured-banner carousel state machine.
//!
//! The carousel owns no timers of its own. Every operation takes `now`, a
//! monotonic offset from any origin the host picks, and deadlines are stored
//! against the same clock. The host calls [`Carousel::tick`] whenever it
//! likes (an animation frame, a test loop) and gets back the visual updates
//! that became due.
//!
//! # Modes
//!
//! **Looping** renders the banners as a strip with the last banner cloned in
//! front and the first cloned at the back:
//!
//! ```text
//! position:  0        1    2    ...  N      N+1
//! strip:     clone(N-1) b0  b1   ...  bN-1   clone(b0)
//! ```
//!
//! The strip position is `current + 1`. Stepping past either end lands on a
//! clone; once the slide transition has finished, a snap-back moves to the
//! matching real banner with animation off, so the jump is invisible. Manual
//! navigation suspends auto-advance for the pause window.
//!
//! **Simple** shows one active card. Indices wrap directly and manual
//! navigation restarts the auto-advance interval.
//!
//! With zero or one banner nothing rotates and navigation does nothing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarouselMode {
    Looping,
    Simple,
}

impl CarouselMode {
    pub fn default_interval_ms(self) -> u64 {
        match self {
            CarouselMode::Looping => 3000,
            CarouselMode::Simple => 5000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CarouselMode::Looping => "looping",
            CarouselMode::Simple => "simple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTiming {
    /// Auto-advance period.
    pub interval: Duration,
    /// Auto-advance suspension after manual navigation (looping mode).
    pub pause: Duration,
    /// Slide transition length; the snap-back waits this long.
    pub transition: Duration,
}

impl CarouselTiming {
    pub fn for_mode(mode: CarouselMode) -> Self {
        Self {
            interval: Duration::from_millis(mode.default_interval_ms()),
            pause: Duration::from_millis(3000),
            transition: Duration::from_millis(600),
        }
    }
}

/// A visual update: where the strip (or active card) should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Strip offset in looping mode, card index in simple mode.
    pub position: isize,
    /// Banner whose indicator is lit, in `[0, N)`.
    pub active: usize,
    /// False for snap-backs and initial placement.
    pub animated: bool,
}

/// Minimum horizontal travel, in pixels, for a touch gesture to navigate.
pub const SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    mode: CarouselMode,
    timing: CarouselTiming,
    /// Raw index. In looping mode it may rest on a clone (`-1` or `len`)
    /// until the snap-back fires.
    current: isize,
    auto_scrolling: bool,
    next_advance: Option<Duration>,
    resume_at: Option<Duration>,
    snap_at: Option<Duration>,
}

impl Carousel {
    pub fn new(len: usize, mode: CarouselMode, timing: CarouselTiming, now: Duration) -> Self {
        Self {
            len,
            mode,
            timing,
            current: 0,
            auto_scrolling: true,
            next_advance: (len > 1).then(|| now + timing.interval),
            resume_at: None,
            snap_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn mode(&self) -> CarouselMode {
        self.mode
    }

    pub fn timing(&self) -> CarouselTiming {
        self.timing
    }

    /// Whether the auto-advance timer is armed.
    pub fn is_rotating(&self) -> bool {
        self.next_advance.is_some()
    }

    pub fn has_indicators(&self) -> bool {
        self.len > 1
    }

    /// Whether the rendered strip carries the two loop clones.
    pub fn uses_clones(&self) -> bool {
        self.mode == CarouselMode::Looping && self.len > 1
    }

    /// False while a manual interaction has suspended auto-advance.
    pub fn is_auto_scrolling(&self) -> bool {
        self.auto_scrolling
    }

    pub fn raw_index(&self) -> isize {
        self.current
    }

    /// The banner currently shown, in `[0, N)`.
    pub fn active_index(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        self.current.rem_euclid(self.len as isize) as usize
    }

    /// Offset into the rendered strip (looping) or card index (simple).
    pub fn strip_position(&self) -> isize {
        if self.uses_clones() {
            self.current + 1
        } else {
            self.current
        }
    }

    pub fn frame(&self, animated: bool) -> Frame {
        Frame {
            position: self.strip_position(),
            active: self.active_index(),
            animated,
        }
    }

    pub fn next(&mut self, now: Duration) -> Vec<Frame> {
        self.manual_step(1, now)
    }

    pub fn prev(&mut self, now: Duration) -> Vec<Frame> {
        self.manual_step(-1, now)
    }

    /// Jump straight to banner `index`. `None` when out of range.
    pub fn go_to(&mut self, index: usize, now: Duration) -> Option<Vec<Frame>> {
        if index >= self.len {
            return None;
        }
        let mut frames = Vec::new();
        if self.len <= 1 {
            return Some(frames);
        }
        frames.extend(self.settle());
        self.after_manual(now);
        self.current = index as isize;
        frames.push(self.frame(true));
        Some(frames)
    }

    /// Suspend auto-advance (hover, touch start).
    ///
    /// Simple mode has no suspended state; the interval restarts instead.
    pub fn pause(&mut self, now: Duration) {
        if self.len > 1 {
            self.after_manual(now);
        }
    }

    /// Navigate by touch gesture: leftward travel past the threshold goes to
    /// the next banner, rightward to the previous one.
    pub fn swipe(&mut self, start_x: f64, end_x: f64, now: Duration) -> Vec<Frame> {
        self.pause(now);
        let travel = start_x - end_x;
        if self.len <= 1 || travel.abs() <= SWIPE_THRESHOLD {
            return Vec::new();
        }
        let delta = if travel > 0.0 { 1 } else { -1 };
        self.step(delta, now)
    }

    /// Cancel every timer. A pending snap-back is applied immediately.
    pub fn stop(&mut self) -> Option<Frame> {
        self.next_advance = None;
        self.resume_at = None;
        self.auto_scrolling = false;
        self.settle()
    }

    /// Run everything that became due by `now`, oldest first.
    pub fn tick(&mut self, now: Duration) -> Vec<Frame> {
        let mut frames = Vec::new();
        loop {
            let due = [self.snap_at, self.resume_at, self.next_advance]
                .into_iter()
                .flatten()
                .filter(|deadline| *deadline <= now)
                .min();
            let Some(at) = due else { break };

            if self.snap_at == Some(at) {
                frames.extend(self.settle());
            } else if self.resume_at == Some(at) {
                self.resume_at = None;
                self.auto_scrolling = true;
            } else {
                self.next_advance = Some(at + self.timing.interval);
                if self.auto_scrolling {
                    frames.extend(self.step(1, at));
                }
            }
        }
        frames
    }

    fn manual_step(&mut self, delta: isize, now: Duration) -> Vec<Frame> {
        if self.len <= 1 {
            return Vec::new();
        }
        self.after_manual(now);
        self.step(delta, now)
    }

    fn after_manual(&mut self, now: Duration) {
        match self.mode {
            CarouselMode::Looping => {
                self.auto_scrolling = false;
                self.resume_at = Some(now + self.timing.pause);
            }
            CarouselMode::Simple => {
                if self.next_advance.is_some() {
                    self.next_advance = Some(now + self.timing.interval);
                }
            }
        }
    }

    fn step(&mut self, delta: isize, now: Duration) -> Vec<Frame> {
        let mut frames: Vec<Frame> = self.settle().into_iter().collect();
        let len = self.len as isize;
        match self.mode {
            CarouselMode::Looping => {
                self.current += delta;
                if self.current >= len || self.current < 0 {
                    self.snap_at = Some(now + self.timing.transition);
                }
            }
            CarouselMode::Simple => {
                self.current = (self.current + delta).rem_euclid(len);
            }
        }
        frames.push(self.frame(true));
        frames
    }

    /// Apply a pending snap-back, if any.
    fn settle(&mut self) -> Option<Frame> {
        self.snap_at.take()?;
        if self.len > 0 {
            self.current = self.current.rem_euclid(self.len as isize);
        }
        Some(self.frame(false))
    }
}
