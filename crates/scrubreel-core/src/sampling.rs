// crates/scrubreel-core/src/sampling.rs
//
// Which frames the thumbnail strip samples, and which worker owns each one.
//
// Frames are spaced `frame_interval = ceil(frame_count / budget)` apart.
// Worker `i` of `K` owns indices `i*interval, i*interval + K*interval, …`, so
// the K tasks interleave and never overlap, so each worker can seek its own
// decoder without coordinating with the others.

/// Sampling layout for one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplePlan {
    frame_count:    u64,
    frame_interval: u64,
    workers:        usize,
}

/// The disjoint slice of the plan owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleTask {
    pub worker: usize,
    pub start:  u64,
    pub stride: u64,
    /// Exclusive upper bound (the file's frame count).
    pub end:    u64,
}

impl SampleTask {
    pub fn frame_indices(&self) -> impl Iterator<Item = u64> {
        // stride is always >= 1 (see SamplePlan::new)
        (self.start..self.end).step_by(self.stride as usize)
    }
}

impl SamplePlan {
    /// `budget` and `workers` are clamped to at least 1.
    ///
    /// ```
    /// use scrubreel_core::sampling::SamplePlan;
    /// let plan = SamplePlan::new(3000, 100, 8);
    /// assert_eq!(plan.frame_interval(), 30);
    /// assert_eq!(plan.sequence_len(), 100);
    /// ```
    pub fn new(frame_count: u64, budget: usize, workers: usize) -> Self {
        let budget = budget.max(1) as u64;
        let frame_interval = frame_count.div_ceil(budget).max(1);
        Self { frame_count, frame_interval, workers: workers.max(1) }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_interval(&self) -> u64 {
        self.frame_interval
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of thumbnails the plan yields (never more than the budget).
    pub fn sequence_len(&self) -> usize {
        self.frame_count.div_ceil(self.frame_interval) as usize
    }

    /// Workers that own at least one frame. Short clips need fewer than K.
    pub fn active_workers(&self) -> usize {
        self.workers.min(self.sequence_len())
    }

    /// Strip slot for a sampled frame index.
    pub fn sequence_index(&self, frame_index: u64) -> usize {
        (frame_index / self.frame_interval) as usize
    }

    pub fn task(&self, worker: usize) -> SampleTask {
        SampleTask {
            worker,
            start:  worker as u64 * self.frame_interval,
            stride: self.frame_interval * self.workers as u64,
            end:    self.frame_count,
        }
    }

    /// Tasks for every worker that has something to do.
    pub fn tasks(&self) -> impl Iterator<Item = SampleTask> + '_ {
        (0..self.active_workers()).map(move |w| self.task(w))
    }
}
