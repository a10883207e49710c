//! The flow state machine.
//!
//! ```text
//! Idle -> ContextAcquired -> ShadersFetched -> ProgramLinked -> Rendered
//!   \__________\_________________\_________________\___________> Failed
//! ```
//!
//! `Rendered` and `Failed` are terminal.

use serde::{Deserialize, Serialize};

use crate::error::TransitionError;

/// Where a single demo run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    Idle,
    ContextAcquired,
    ShadersFetched,
    ProgramLinked,
    Rendered,
    Failed,
}

impl FlowState {
    /// The state that follows this one on success, if any.
    pub fn successor(self) -> Option<FlowState> {
        match self {
            FlowState::Idle => Some(FlowState::ContextAcquired),
            FlowState::ContextAcquired => Some(FlowState::ShadersFetched),
            FlowState::ShadersFetched => Some(FlowState::ProgramLinked),
            FlowState::ProgramLinked => Some(FlowState::Rendered),
            FlowState::Rendered | FlowState::Failed => None,
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, FlowState::Rendered | FlowState::Failed)
    }

    /// Validates a transition to `next`.
    ///
    /// Allowed transitions are the success edge to [`successor`](Self::successor)
    /// and the failure edge to `Failed` from any non-terminal state.
    pub fn transition(self, next: FlowState) -> Result<FlowState, TransitionError> {
        let allowed = match next {
            FlowState::Failed => !self.is_terminal(),
            _ => self.successor() == Some(next),
        };
        if allowed {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

/// A state machine instance that remembers every state it visited.
#[derive(Debug, Clone)]
pub struct Flow {
    state: FlowState,
    history: Vec<FlowState>,
}

impl Flow {
    /// A fresh flow in `Idle`.
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            history: vec![FlowState::Idle],
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// States visited so far, starting with `Idle`.
    pub fn history(&self) -> &[FlowState] {
        &self.history
    }

    /// Moves to `next`, leaving the flow untouched if the edge is not allowed.
    pub fn advance(&mut self, next: FlowState) -> Result<(), TransitionError> {
        self.state = self.state.transition(next)?;
        self.history.push(next);
        log::debug!("flow state -> {next:?}");
        Ok(())
    }

    /// Moves to `Failed`. A no-op if the flow already ended.
    pub fn fail(&mut self) {
        if self.advance(FlowState::Failed).is_err() {
            log::debug!("flow already terminal in {:?}", self.state);
        }
    }

    pub fn into_history(self) -> Vec<FlowState> {
        self.history
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}
