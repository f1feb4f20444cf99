//! Cancellable timers on the session clock
//!
//! Stands in for browser intervals/timeouts so every pending callback has a
//! handle that can be cancelled on pause, round reset or teardown. Timers fire
//! in due order; callers pull one at a time so a handler can cancel timers
//! that would otherwise fire in the same frame.

/// Identifies a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u32);

/// What a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// One-second elapsed-time counter
    ElapsedSecond,
    /// Power accumulation while the kick key is held
    ChargeTick,
    /// End of the post-kick feedback display
    FeedbackDelay,
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    kind: TimerKind,
    due_ms: f64,
    /// Repeat period; None for one-shot timers
    interval_ms: Option<f64>,
}

#[derive(Debug)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u32,
    max_catchup: u32,
}

impl Scheduler {
    pub fn new(max_catchup: u32) -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
            max_catchup: max_catchup.max(1),
        }
    }

    fn alloc(&mut self) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// Fire once, `delay_ms` after `now_ms`
    pub fn once(&mut self, now_ms: f64, delay_ms: f64, kind: TimerKind) -> TimerHandle {
        let handle = self.alloc();
        self.timers.push(Timer {
            handle,
            kind,
            due_ms: now_ms + delay_ms,
            interval_ms: None,
        });
        handle
    }

    /// Fire every `interval_ms`, first firing one interval after `now_ms`
    pub fn every(&mut self, now_ms: f64, interval_ms: f64, kind: TimerKind) -> TimerHandle {
        let handle = self.alloc();
        self.timers.push(Timer {
            handle,
            kind,
            due_ms: now_ms + interval_ms,
            interval_ms: Some(interval_ms),
        });
        handle
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pop the earliest timer due at or before `now_ms`.
    ///
    /// Repeating timers are rescheduled one period later. A repeating timer
    /// that has fallen more than `max_catchup` periods behind is realigned to
    /// `now_ms` instead of replaying every missed period.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerHandle, TimerKind)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.handle.cmp(&b.handle))
            })
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        let fired = (timer.handle, timer.kind);
        match timer.interval_ms {
            Some(interval) => {
                if now_ms - timer.due_ms >= interval * self.max_catchup as f64 {
                    timer.due_ms = now_ms + interval;
                } else {
                    timer.due_ms += interval;
                }
            }
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(fired)
    }
}
