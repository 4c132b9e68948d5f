// crates/scrubreel-cli/src/helpers/hover_sim.rs
//
// Replays a synthetic left-to-right hover sweep through ScrubInputThrottler
// so the throttle behaviour can be inspected without a UI.
//
// Timestamps are built from one base Instant plus offsets; nothing sleeps.

use std::time::{Duration, Instant};

use scrubreel_core::throttle::ScrubInputThrottler;
use scrubreel_core::PreviewRequest;

/// One request the throttler let through, `at_ms` after the pointer entered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emission {
    pub at_ms:   u64,
    pub request: PreviewRequest,
}

pub struct Sweep {
    pub duration_secs: f64,
    pub control_width: f64,
    /// Spacing between pointer-move events.
    pub step_ms:       u64,
    /// Time between enter and leave.
    pub span_ms:       u64,
    pub window:        Duration,
}

impl Sweep {
    /// Enter at x = 0, move every `step_ms` toward the right edge (reached at
    /// `span_ms`), then leave. Returns everything the throttler emitted.
    pub fn run(&self) -> Vec<Emission> {
        let mut throttler = ScrubInputThrottler::new(self.duration_secs, self.control_width, self.window);
        let t0 = Instant::now();
        throttler.pointer_enter(t0);

        let step = self.step_ms.max(1);
        let mut out = Vec::new();
        let mut at = step;
        while at <= self.span_ms {
            let x = self.control_width * at as f64 / self.span_ms.max(1) as f64;
            if let Some(request) = throttler.pointer_move(t0 + Duration::from_millis(at), x, x, 0.0) {
                out.push(Emission { at_ms: at, request });
            }
            at += step;
        }
        if let Some(request) = throttler.pointer_leave() {
            out.push(Emission { at_ms: self.span_ms, request });
        }
        out
    }
}
