use sense_core::AgentSnapshot;

/// Advances an agent snapshot through simulated physics steps.
pub trait MovementPredictor: Send + Sync {
    /// Advance `snapshot` by one tick in place.
    fn step(&self, snapshot: &mut AgentSnapshot);

    fn predict(&self, snapshot: &mut AgentSnapshot, ticks: u32) {
        for _ in 0..ticks {
            self.step(snapshot);
        }
    }
}

/// Free-fall integrator using vanilla player constants. It does not collide
/// with blocks, so predictions past the first surface are meaningless.
#[derive(Debug, Clone, Copy)]
pub struct GravityPredictor {
    pub gravity: f64,
    pub vertical_drag: f64,
    pub horizontal_drag: f64,
}

impl Default for GravityPredictor {
    fn default() -> Self {
        Self {
            gravity: 0.08,
            vertical_drag: 0.98,
            horizontal_drag: 0.91,
        }
    }
}

impl MovementPredictor for GravityPredictor {
    fn step(&self, snapshot: &mut AgentSnapshot) {
        if snapshot.on_ground {
            return;
        }
        let before = snapshot.position.y;
        snapshot.position += snapshot.velocity;
        snapshot.velocity.y = (snapshot.velocity.y - self.gravity) * self.vertical_drag;
        snapshot.velocity.x *= self.horizontal_drag;
        snapshot.velocity.z *= self.horizontal_drag;
        snapshot.fall_distance += (before - snapshot.position.y).max(0.0);
    }
}
