// crates/scrubreel-core/src/throttle.rs
//
// ScrubInputThrottler: turns raw pointer enter/move/leave events from the
// timeline control into a rate-limited stream of PreviewRequests.
//
// Pointer-move events arrive far faster than a seek+decode completes, so at
// most one Show is emitted per throttle window; moves inside the window are
// dropped, not queued. Leave always emits exactly one Hide.
//
// Time is passed in by the caller (`now: Instant`) so the machine has no
// clock of its own and is deterministic under test.

use std::time::{Duration, Instant};

use crate::media_types::PreviewRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverPhase {
    Idle,
    Hovering,
}

/// Mutable hover bookkeeping. Only the throttler writes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverState {
    pub inside:        bool,
    pub last_emit:     Option<Instant>,
    pub duration_secs: f64,
    /// Width of the timeline control in local pixels.
    pub control_width: f64,
}

pub struct ScrubInputThrottler {
    state:  HoverState,
    window: Duration,
}

impl ScrubInputThrottler {
    pub fn new(duration_secs: f64, control_width: f64, window: Duration) -> Self {
        Self {
            state: HoverState {
                inside: false,
                last_emit: None,
                duration_secs,
                control_width,
            },
            window,
        }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn phase(&self) -> HoverPhase {
        if self.state.inside { HoverPhase::Hovering } else { HoverPhase::Idle }
    }

    /// Called when a new file's duration becomes known.
    pub fn set_duration(&mut self, duration_secs: f64) {
        self.state.duration_secs = duration_secs;
    }

    pub fn set_control_width(&mut self, width: f64) {
        self.state.control_width = width;
    }

    /// Media position under local pixel `x`:
    /// `duration * 1000 * (x / width)`, with `x` clamped to the control.
    ///
    /// ```
    /// use std::time::Duration;
    /// use scrubreel_core::throttle::ScrubInputThrottler;
    /// let t = ScrubInputThrottler::new(120.0, 100.0, Duration::from_millis(50));
    /// assert_eq!(t.target_ms(50.0), 60_000.0);
    /// ```
    pub fn target_ms(&self, local_x: f64) -> f64 {
        let width = self.state.control_width;
        if !(width > 0.0) || !self.state.duration_secs.is_finite() {
            return 0.0;
        }
        let x = local_x.clamp(0.0, width);
        self.state.duration_secs * 1000.0 * (x / width)
    }

    /// Pointer entered the control. Starts the throttle window at `now`, so
    /// the first Show comes one window after entry. Returns `true` when this
    /// is an Idle → Hovering transition (the caller pauses playback on it).
    pub fn pointer_enter(&mut self, now: Instant) -> bool {
        let entered = !self.state.inside;
        self.state.inside    = true;
        self.state.last_emit = Some(now);
        entered
    }

    /// Pointer moved to local `x` (global `global_x`, `global_y`). Emits a
    /// Show when hovering and at least one window has passed since the last
    /// emission; otherwise the move is dropped.
    pub fn pointer_move(
        &mut self,
        now:      Instant,
        local_x:  f64,
        global_x: f64,
        global_y: f64,
    ) -> Option<PreviewRequest> {
        if !self.state.inside {
            return None;
        }
        let due = match self.state.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.window,
            None       => true,
        };
        if !due {
            return None;
        }
        self.state.last_emit = Some(now);
        Some(PreviewRequest::Show {
            x: global_x,
            y: global_y,
            timestamp_ms: self.target_ms(local_x),
        })
    }

    /// Pointer left the control. Emits Hide exactly once per hover,
    /// regardless of where the throttle window stands.
    pub fn pointer_leave(&mut self) -> Option<PreviewRequest> {
        if !self.state.inside {
            return None;
        }
        self.state.inside = false;
        Some(PreviewRequest::Hide)
    }
}
