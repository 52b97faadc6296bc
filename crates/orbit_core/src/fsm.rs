//! State Machine Runtime
//!
//! Flat statecharts used for idempotent toggles such as "visible / hidden".
//! An event with no matching transition from the current state is ignored,
//! so replaying the same event never re-enters a state.

/// Identifier for a state within a state machine
pub type StateId = u32;

/// Identifier for an event type
pub type EventId = u32;

/// A transition in the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from_state: StateId,
    pub event: EventId,
    pub to_state: StateId,
}

impl Transition {
    pub fn new(from: StateId, event: EventId, to: StateId) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder {
    initial_state: StateId,
    transitions: Vec<Transition>,
}

impl StateMachineBuilder {
    pub fn new(initial_state: StateId) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
        }
    }

    /// Add a simple transition (from, event, to)
    pub fn on(mut self, from: StateId, event: EventId, to: StateId) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine {
        StateMachine::new(self.initial_state, self.transitions)
    }
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine {
    current_state: StateId,
    transitions: Vec<Transition>,
    /// History of state transitions (for debugging)
    history: Vec<(StateId, EventId, StateId)>,
}

impl StateMachine {
    /// Create a new state machine with an initial state and transitions
    pub fn new(initial_state: StateId, transitions: Vec<Transition>) -> Self {
        Self {
            current_state: initial_state,
            transitions,
            history: Vec::new(),
        }
    }

    /// Create a builder for a state machine
    pub fn builder(initial_state: StateId) -> StateMachineBuilder {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: StateId) -> bool {
        self.current_state == state
    }

    /// Get transition history
    pub fn history(&self) -> &[(StateId, EventId, StateId)] {
        &self.history
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: EventId) -> bool {
        self.find(event).is_some()
    }

    /// Send an event, returning the transition taken if any
    pub fn send(&mut self, event: EventId) -> Option<Transition> {
        let transition = self.find(event)?;

        self.current_state = transition.to_state;
        self.history
            .push((transition.from_state, event, transition.to_state));
        tracing::trace!(
            from = transition.from_state,
            to = transition.to_state,
            event,
            "fsm transition"
        );

        Some(transition)
    }

    fn find(&self, event: EventId) -> Option<Transition> {
        let current = self.current_state;
        self.transitions
            .iter()
            .find(|t| t.from_state == current && t.event == event)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // State constants for tests
    const HIDDEN: StateId = 0;
    const VISIBLE: StateId = 1;

    // Event constants for tests
    const ENTER: EventId = 1;
    const LEAVE: EventId = 2;

    fn toggle() -> StateMachine {
        StateMachine::builder(HIDDEN)
            .on(HIDDEN, ENTER, VISIBLE)
            .on(VISIBLE, LEAVE, HIDDEN)
            .build()
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = toggle();
        assert_eq!(fsm.current_state(), HIDDEN);

        assert_eq!(fsm.send(ENTER), Some(Transition::new(HIDDEN, ENTER, VISIBLE)));
        assert!(fsm.is_in(VISIBLE));

        fsm.send(LEAVE);
        assert!(fsm.is_in(HIDDEN));
    }

    #[test]
    fn test_repeated_event_is_ignored() {
        let mut fsm = toggle();

        assert!(fsm.send(ENTER).is_some());
        assert!(fsm.send(ENTER).is_none());
        assert!(fsm.is_in(VISIBLE));
        assert_eq!(fsm.history().len(), 1);
    }

    #[test]
    fn test_can_send() {
        let fsm = toggle();

        assert!(fsm.can_send(ENTER));
        assert!(!fsm.can_send(LEAVE));
    }

    #[test]
    fn test_history() {
        let mut fsm = toggle();

        fsm.send(ENTER);
        fsm.send(LEAVE);
        fsm.send(LEAVE);

        let history = fsm.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], (HIDDEN, ENTER, VISIBLE));
        assert_eq!(history[1], (VISIBLE, LEAVE, HIDDEN));
    }
}
