//! Lane-dodging agents: a [`DirectionController`] driven by a two-state
//! behaviour machine.

mod controller;
mod states;

pub use controller::{DirectionController, ProbeVolume};
pub use states::{AgentState, AvoidObstacleState, MoveForwardState};

use crate::fsm::{StateMachine, Transition};

/// Behaviour machine of one agent: MoveForward and AvoidObstacle, switching
/// on whether an obstacle is ahead.
pub struct AgentStateMachine {
    fsm: StateMachine<AgentState, DirectionController>,
}

impl Default for AgentStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentStateMachine {
    pub fn new() -> Self {
        let mut fsm = StateMachine::new();
        fsm.set_initial_state(AgentState::MoveForward);
        fsm.add_state(
            AgentState::MoveForward,
            MoveForwardState,
            vec![Transition::new(
                AgentState::AvoidObstacle,
                DirectionController::is_obstacle_ahead,
            )],
        );
        fsm.add_state(
            AgentState::AvoidObstacle,
            AvoidObstacleState,
            vec![Transition::new(
                AgentState::MoveForward,
                |ctl: &DirectionController| !ctl.is_obstacle_ahead(),
            )],
        );
        Self { fsm }
    }

    pub fn update(&mut self, controller: &mut DirectionController) -> Option<AgentState> {
        self.fsm.update(controller)
    }

    pub fn state(&self) -> AgentState {
        self.fsm.current().unwrap_or(AgentState::MoveForward)
    }
}

/// Agent component: its controller plus the machine that drives it.
pub struct Agent {
    pub controller: DirectionController,
    pub brain: AgentStateMachine,
    /// Vertical speed while unsupported by any segment.
    pub fall_speed: f32,
}

impl Agent {
    pub fn new(controller: DirectionController) -> Self {
        Self {
            controller,
            brain: AgentStateMachine::new(),
            fall_speed: 0.0,
        }
    }

    pub fn tick(&mut self) -> Option<AgentState> {
        let Agent {
            controller, brain, ..
        } = self;
        brain.update(controller)
    }
}
