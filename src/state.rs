//! Application state management.
//!
//! Two small state machines drive every control in the window: the
//! one-shot session lifecycle (model loading) and the per-request
//! generation phase. Widget enablement is derived purely from this
//! state, never toggled ad hoc.

/// Session lifecycle, driven by the one-shot model load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Model load is in flight on a background thread.
    Initializing,
    /// Model is loaded; generation may be triggered.
    Ready,
    /// Model load failed; the application shuts down after the fatal
    /// dialog is acknowledged.
    Failed,
}

/// Per-request generation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// No request in flight.
    Idle,
    /// A generation worker is running; trigger controls are disabled.
    Running,
}

/// Combined application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub phase: GenerationPhase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Initializing,
            phase: GenerationPhase::Idle,
        }
    }

    /// Initializing → Ready. One-shot; ignored in any other status.
    pub fn model_loaded(&mut self) {
        if self.status == SessionStatus::Initializing {
            self.status = SessionStatus::Ready;
        }
    }

    /// Initializing → Failed. One-shot; ignored in any other status.
    pub fn model_failed(&mut self) {
        if self.status == SessionStatus::Initializing {
            self.status = SessionStatus::Failed;
        }
    }

    /// Whether the trigger control (and the prompt field) is enabled.
    pub fn can_generate(&self) -> bool {
        self.status == SessionStatus::Ready && self.phase == GenerationPhase::Idle
    }

    /// Idle → Running, but only when the session is ready. Returns
    /// whether the transition happened; callers must not spawn a worker
    /// when it did not.
    pub fn begin_generation(&mut self) -> bool {
        if !self.can_generate() {
            return false;
        }
        self.phase = GenerationPhase::Running;
        true
    }

    /// Running → Idle. Idempotent: a duplicate completion event leaves
    /// the state unchanged.
    pub fn generation_done(&mut self) {
        self.phase = GenerationPhase::Idle;
    }

    pub fn is_running(&self) -> bool {
        self.phase == GenerationPhase::Running
    }

    pub fn is_initializing(&self) -> bool {
        self.status == SessionStatus::Initializing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_initializing_and_idle() {
        let state = SessionState::new();
        assert_eq!(state.status, SessionStatus::Initializing);
        assert_eq!(state.phase, GenerationPhase::Idle);
        assert!(!state.can_generate());
    }

    #[test]
    fn model_loaded_enables_generation() {
        let mut state = SessionState::new();
        state.model_loaded();
        assert_eq!(state.status, SessionStatus::Ready);
        assert!(state.can_generate());
    }

    #[test]
    fn model_failed_never_enables_generation() {
        let mut state = SessionState::new();
        state.model_failed();
        assert_eq!(state.status, SessionStatus::Failed);
        assert!(!state.can_generate());
        assert!(!state.begin_generation());

        // A stray success event after failure must not revive the session.
        state.model_loaded();
        assert_eq!(state.status, SessionStatus::Failed);
    }

    #[test]
    fn generation_disables_controls_until_done() {
        let mut state = SessionState::new();
        state.model_loaded();

        assert!(state.begin_generation());
        assert!(state.is_running());
        assert!(!state.can_generate());

        // Re-trigger while running is refused.
        assert!(!state.begin_generation());

        state.generation_done();
        assert!(state.can_generate());
    }

    #[test]
    fn begin_generation_refused_while_initializing() {
        let mut state = SessionState::new();
        assert!(!state.begin_generation());
        assert_eq!(state.phase, GenerationPhase::Idle);
    }

    #[test]
    fn duplicate_completion_is_idempotent() {
        let mut state = SessionState::new();
        state.model_loaded();
        state.begin_generation();

        state.generation_done();
        state.generation_done();
        assert!(state.can_generate());
    }
}
