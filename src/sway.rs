//! Slow back-and-forth yaw so both sides of the morphing mesh come into view.

use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_time::Time;
use bevy_transform::components::Transform;

/// Rotates the entity about the Y axis between `-max_angle` and `max_angle`.
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component, Default, Debug)]
pub struct Sway {
    /// Half swings per second.
    pub speed: f32,
    /// Radians.
    pub max_angle: f32,
}

impl Default for Sway {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_angle: 45f32.to_radians(),
        }
    }
}

impl Sway {
    pub fn angle(&self, elapsed: f32) -> f32 {
        sway_angle(elapsed, self.speed, self.max_angle)
    }
}

/// Bounces `t` back and forth in `0..=length`.
pub fn ping_pong(t: f32, length: f32) -> f32 {
    let t = t.rem_euclid(length * 2.0);
    length - (t - length).abs()
}

/// Hermite interpolation from `from` to `to`, easing in and out.
pub fn smooth_step(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let t = t * t * (3.0 - 2.0 * t);
    from + (to - from) * t
}

pub fn sway_angle(elapsed: f32, speed: f32, max_angle: f32) -> f32 {
    smooth_step(-max_angle, max_angle, ping_pong(elapsed * speed, 1.0))
}

pub fn apply_sway(time: Res<Time>, mut swaying: Query<(&Sway, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (sway, mut transform) in &mut swaying {
        transform.rotation = Quat::from_rotation_y(sway.angle(elapsed));
    }
}
