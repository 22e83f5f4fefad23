use parking_lot::RwLock;
use std::sync::Arc;

use strafe_kinematics::Pose2d;

/// Latest state published by the control loop.
#[derive(Clone, Debug, Default)]
pub struct State {
    pub tick: u64,
    pub estimate: Pose2d,
    pub truth: Pose2d,
    pub position_error: f64,
    pub finished: bool,
    pub faults: Vec<String>,
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn snapshot(bb: &Blackboard) -> State {
    (*bb.read()).clone()
}

pub fn publish(bb: &Blackboard, tick: u64, estimate: Pose2d, truth: Pose2d) {
    let mut g = bb.write();
    g.tick = tick;
    g.estimate = estimate;
    g.truth = truth;
    g.position_error = estimate.translation().distance(&truth.translation());
}

pub fn finish(bb: &Blackboard) {
    bb.write().finished = true;
}

/// Record a fault once. Returns whether it was new.
pub fn raise_fault(bb: &Blackboard, msg: &str) -> bool {
    let mut g = bb.write();
    if g.faults.iter().any(|s| s == msg) {
        false
    } else {
        g.faults.push(msg.to_string());
        true
    }
}
