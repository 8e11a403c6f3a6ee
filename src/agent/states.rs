use super::DirectionController;
use crate::fsm::State;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentState {
    MoveForward,
    AvoidObstacle,
}

/// Run straight ahead while the lane is clear.
pub struct MoveForwardState;

impl State<DirectionController> for MoveForwardState {
    fn execute(&mut self, ctl: &mut DirectionController) {
        if !ctl.is_obstacle_ahead() {
            ctl.move_forward();
        }
    }
}

/// Dodge out of a blocked lane, then keep running.
pub struct AvoidObstacleState;

impl State<DirectionController> for AvoidObstacleState {
    fn execute(&mut self, ctl: &mut DirectionController) {
        if ctl.is_obstacle_ahead() {
            ctl.change_lane();
        }
        ctl.move_forward();
    }
}
