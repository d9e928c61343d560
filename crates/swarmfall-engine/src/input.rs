//! Per-step input snapshot and the player control system.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{Collider, IsPlayer, PlayerControlled, Transform, Velocity};
use crate::math::{normalize_or, yaw_forward, yaw_of};
use crate::sim::Sim;

/// What the presentation layer sampled from the devices for this step.
///
/// Axes are in camera space: `move_x` strafes right, `move_z` moves away
/// from the camera. The triggers are one-shot and are cleared by the
/// scheduler after each step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_x: f32,
    pub move_z: f32,
    pub jump_pressed: bool,
    pub dash_pressed: bool,
    /// Camera yaw in radians.
    pub camera_yaw: f32,
}

impl InputSnapshot {
    /// Movement direction on the XZ plane, rotated by the camera yaw and
    /// clamped to unit length.
    pub fn world_move(&self) -> Vec2 {
        let (sin, cos) = self.camera_yaw.sin_cos();
        let raw = Vec2::new(self.move_x, self.move_z);
        Vec2::new(raw.x * cos - raw.y * sin, raw.x * sin + raw.y * cos).clamp_length_max(1.0)
    }

    pub fn clear_triggers(&mut self) {
        self.jump_pressed = false;
        self.dash_pressed = false;
    }
}

/// Drive the player's velocity from the input snapshot: walking, dashing,
/// jumping, gravity and ground snapping.
pub fn player_control(sim: &mut Sim) {
    let dt = sim.dt();
    let input = sim.input;
    let gravity = sim.config.balance.player.gravity;
    let movement = input.world_move();

    for e in sim.world.query::<(IsPlayer, PlayerControlled, Transform, Velocity)>() {
        let (Some(&ctrl), Some(&tf), Some(&vel)) = (
            sim.world.get::<PlayerControlled>(e),
            sim.world.get::<Transform>(e),
            sim.world.get::<Velocity>(e),
        ) else {
            continue;
        };
        let (mut ctrl, mut tf, mut vel) = (ctrl, tf, vel);

        ctrl.dash_cooldown_timer = (ctrl.dash_cooldown_timer - dt).max(0.0);
        ctrl.dash_time_left = (ctrl.dash_time_left - dt).max(0.0);

        if input.dash_pressed && ctrl.dash_cooldown_timer <= 0.0 {
            let dir = normalize_or(movement, yaw_forward(tf.rot_y));
            ctrl.dash_cooldown_timer = ctrl.dash_cooldown;
            ctrl.dash_time_left = ctrl.dash_duration;
            ctrl.dash_dir_x = dir.x;
            ctrl.dash_dir_z = dir.y;
        }

        if ctrl.dash_time_left > 0.0 {
            vel.set_planar(Vec2::new(ctrl.dash_dir_x, ctrl.dash_dir_z) * ctrl.dash_speed);
        } else {
            vel.set_planar(movement * ctrl.move_speed);
        }

        if input.jump_pressed && ctrl.jumps_remaining > 0 {
            vel.y = ctrl.jump_force;
            ctrl.jumps_remaining -= 1;
        }
        vel.y += gravity * dt;

        if movement != Vec2::ZERO {
            tf.rot_y = yaw_of(movement);
        }

        let half = sim.world.get::<Collider>(e).map_or(0.0, |c| c.half_height);
        let ground = sim.ground(tf.x, tf.z) + half;
        ctrl.grounded = false;
        if tf.y <= ground {
            tf.y = ground;
            // A jump launched this step keeps its upward velocity.
            if vel.y <= 0.0 {
                vel.y = 0.0;
                ctrl.grounded = true;
                ctrl.jumps_remaining = ctrl.max_jumps;
            }
        }

        sim.attach(e, ctrl);
        sim.attach(e, tf);
        sim.attach(e, vel);
    }
}
