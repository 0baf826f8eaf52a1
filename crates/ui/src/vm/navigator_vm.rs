use lab_core::model::{NavigationPolicy, ProgressRecord};
use lab_core::steps;

/// Values a navigator transition asks the store to persist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepCommit {
    pub current_step: u32,
    pub completed: bool,
    pub progress_percentage: u8,
}

/// Tracks which step of an experiment is on screen.
///
/// `index` is 0-based and always within `[0, total_steps - 1]` (0 for an
/// experiment without steps). Every transition returns the commit to send,
/// or `None` when nothing changed. With zero steps navigation is disabled
/// and every transition returns `None`.
///
/// `started` only drives the "ready to start" screen; transitions do not
/// check it, so a caller that skips `start()` still moves and commits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepNavigator {
    index: usize,
    total_steps: usize,
    started: bool,
    policy: NavigationPolicy,
}

impl StepNavigator {
    #[must_use]
    pub fn new(total_steps: usize, policy: NavigationPolicy) -> Self {
        Self {
            index: 0,
            total_steps,
            started: false,
            policy,
        }
    }

    /// Restore the displayed step from a stored step count.
    ///
    /// Learners resuming saved progress skip the "ready to start" gate.
    pub fn initialize(&mut self, saved_step: u32) {
        self.index = steps::index_from_saved(saved_step, self.total_steps);
        if saved_step > 0 && self.is_enabled() {
            self.started = true;
        }
    }

    /// Adopt a record returned by the store without committing anything.
    pub fn reconcile(&mut self, record: &ProgressRecord) {
        self.initialize(record.current_step);
    }

    /// Dismiss the "ready to start" gate.
    pub fn start(&mut self) {
        if self.is_enabled() {
            self.started = true;
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    #[must_use]
    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.total_steps > 0
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.is_enabled() && self.index == self.last_index()
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.is_enabled() && self.index < self.last_index()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.policy.allows_backward() && self.index > 0
    }

    /// Percentage for the step currently on screen.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        if !self.is_enabled() {
            return 0;
        }
        let reached = steps::saved_from_index(self.index, self.total_steps);
        steps::percentage(reached, self.total_steps, false)
    }

    pub fn next(&mut self) -> Option<StepCommit> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.commit(self.is_last_step())
    }

    /// Step back one; a no-op under `NavigationPolicy::Linear`.
    pub fn previous(&mut self) -> Option<StepCommit> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.commit(false)
    }

    /// Move to `target`, clamped to the valid range.
    ///
    /// Backward jumps are ignored under `NavigationPolicy::Linear`.
    pub fn jump_to(&mut self, target: usize) -> Option<StepCommit> {
        if !self.is_enabled() {
            return None;
        }
        let target = target.min(self.last_index());
        if target == self.index || (target < self.index && !self.policy.allows_backward()) {
            return None;
        }
        self.index = target;
        self.commit(self.is_last_step())
    }

    /// Jump to the final step and report the experiment as finished.
    pub fn mark_complete(&mut self) -> Option<StepCommit> {
        if !self.is_enabled() {
            return None;
        }
        self.index = self.last_index();
        self.commit(true)
    }

    /// Build the commit for the current index.
    #[must_use]
    pub fn commit(&self, completed: bool) -> Option<StepCommit> {
        if !self.is_enabled() {
            return None;
        }
        let current_step = steps::saved_from_index(self.index, self.total_steps);
        Some(StepCommit {
            current_step,
            completed,
            progress_percentage: steps::percentage(current_step, self.total_steps, completed),
        })
    }

    fn last_index(&self) -> usize {
        self.total_steps.saturating_sub(1)
    }
}
