//! Vertex-by-vertex morph between the spherical and flattened layouts.
//!
//! A cycle has four segments: morph toward the current target while
//! `progress < 1`, hold while `progress <= 2`, then flip the target and start
//! again from zero.

use bevy_ecs::prelude::*;
use bevy_math::Vec3;
use bevy_reflect::prelude::*;

use crate::{builder::GeodesicMeshes, error::GeodesicError};

/// Which layout the morph is heading toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum MorphState {
    /// Flattened net toward sphere.
    #[default]
    Unflattening,
    /// Sphere toward flattened net.
    Flattening,
}

impl MorphState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Unflattening => Self::Flattening,
            Self::Flattening => Self::Unflattening,
        }
    }
}

/// The two vertex arrays a morph blends between, index for index.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct MorphTargets {
    pub spherical: Vec<Vec3>,
    pub flattened: Vec<Vec3>,
}

impl MorphTargets {
    pub fn new(spherical: Vec<Vec3>, flattened: Vec<Vec3>) -> Result<Self, GeodesicError> {
        if spherical.len() != flattened.len() {
            return Err(GeodesicError::VariantMismatch {
                spherical: spherical.len(),
                flattened: flattened.len(),
            });
        }
        Ok(Self {
            spherical,
            flattened,
        })
    }

    pub fn len(&self) -> usize {
        self.spherical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spherical.is_empty()
    }

    /// `(from, to)` arrays for a morph in `state`.
    pub fn endpoints(&self, state: MorphState) -> (&[Vec3], &[Vec3]) {
        match state {
            MorphState::Unflattening => (&self.flattened, &self.spherical),
            MorphState::Flattening => (&self.spherical, &self.flattened),
        }
    }

    /// Writes the positions `blend` (clamped to `0..=1`) of the way through a
    /// morph in `state`. A blend of 1 yields the target array exactly.
    fn blend_into(&self, state: MorphState, blend: f32, buffer: &mut [Vec3]) {
        let (from, to) = self.endpoints(state);
        let blend = blend.clamp(0.0, 1.0);
        if blend >= 1.0 {
            buffer.copy_from_slice(to);
            return;
        }
        for ((dst, a), b) in buffer.iter_mut().zip(from).zip(to) {
            *dst = a.lerp(*b, blend);
        }
    }
}

impl From<&GeodesicMeshes> for MorphTargets {
    fn from(meshes: &GeodesicMeshes) -> Self {
        Self {
            spherical: meshes.spherical().vertices.clone(),
            flattened: meshes.flattened().vertices.clone(),
        }
    }
}

/// Drives one morphing mesh.
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component, Debug)]
pub struct MorphAnimator {
    state: MorphState,
    progress: f32,
    /// Progress units per second.
    pub speed: f32,
    settled: bool,
}

impl Default for MorphAnimator {
    fn default() -> Self {
        Self::new(MorphState::default(), 0.5)
    }
}

impl MorphAnimator {
    pub fn new(state: MorphState, speed: f32) -> Self {
        Self {
            state,
            progress: 0.0,
            speed,
            settled: false,
        }
    }

    pub fn state(&self) -> MorphState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// How far the current morph has gone, in `0..=1`.
    pub fn blend(&self) -> f32 {
        self.progress.min(1.0)
    }

    /// Advances by `delta` seconds and writes the morphed positions to `buffer`.
    ///
    /// Returns whether `buffer` was written. Nothing is written during the
    /// hold once the target has been reached. A tick that flips the direction
    /// only writes if the target was never reached, which happens when a
    /// single step carries progress from below 1 past 2.
    pub fn tick(
        &mut self,
        delta: f32,
        targets: &MorphTargets,
        buffer: &mut [Vec3],
    ) -> Result<bool, GeodesicError> {
        if buffer.len() != targets.spherical.len() || buffer.len() != targets.flattened.len() {
            return Err(GeodesicError::TargetLengthMismatch {
                buffer: buffer.len(),
                spherical: targets.spherical.len(),
                flattened: targets.flattened.len(),
            });
        }

        self.progress += delta * self.speed;

        if self.progress > 2.0 {
            let written = !self.settled;
            if written {
                targets.blend_into(self.state, 1.0, buffer);
            }
            self.state = self.state.toggled();
            self.progress = 0.0;
            self.settled = false;
            return Ok(written);
        }

        if self.settled {
            return Ok(false);
        }

        targets.blend_into(self.state, self.progress, buffer);
        self.settled = self.progress >= 1.0;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MeshBuilder;

    fn targets() -> MorphTargets {
        MorphTargets::from(&MeshBuilder::new(1).build().unwrap())
    }

    #[test]
    fn halfway_is_the_midpoint() {
        let targets = targets();
        let mut buffer = targets.flattened.clone();
        let mut animator = MorphAnimator::new(MorphState::Unflattening, 1.0);

        assert_eq!(animator.tick(0.5, &targets, &mut buffer), Ok(true));
        for (i, position) in buffer.iter().enumerate() {
            let expected = (targets.flattened[i] + targets.spherical[i]) / 2.0;
            assert!(position.abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn morph_reaches_target_then_holds_then_toggles() {
        let targets = targets();
        let mut buffer = targets.flattened.clone();
        let mut animator = MorphAnimator::new(MorphState::Flattening, 0.5);

        // 0.25 progress per tick
        for _ in 0..4 {
            assert_eq!(animator.tick(0.5, &targets, &mut buffer), Ok(true));
        }
        assert_eq!(animator.progress(), 1.0);
        assert_eq!(buffer, targets.flattened);

        for _ in 0..4 {
            assert_eq!(animator.tick(0.5, &targets, &mut buffer), Ok(false));
        }
        assert_eq!(animator.progress(), 2.0);
        assert_eq!(animator.state(), MorphState::Flattening);

        assert_eq!(animator.tick(0.5, &targets, &mut buffer), Ok(false));
        assert_eq!(animator.state(), MorphState::Unflattening);
        assert_eq!(animator.progress(), 0.0);
        assert_eq!(buffer, targets.flattened);
    }

    #[test]
    fn two_cycles_return_to_flattened() {
        let targets = targets();
        let mut buffer = targets.flattened.clone();
        let mut animator = MorphAnimator::new(MorphState::Unflattening, 0.5);

        // one cycle is 4 morph ticks, 4 hold ticks and 1 toggle tick
        for _ in 0..9 {
            animator.tick(0.5, &targets, &mut buffer).unwrap();
        }
        assert_eq!(buffer, targets.spherical);
        assert_eq!(animator.state(), MorphState::Flattening);

        for _ in 0..9 {
            animator.tick(0.5, &targets, &mut buffer).unwrap();
        }
        assert_eq!(buffer, targets.flattened);
        assert_eq!(animator.state(), MorphState::Unflattening);
    }

    #[test]
    fn overshooting_tick_snaps_to_target() {
        let targets = targets();
        let mut buffer = targets.flattened.clone();
        let mut animator = MorphAnimator::new(MorphState::Unflattening, 1.0);

        assert_eq!(animator.tick(1.3, &targets, &mut buffer), Ok(true));
        assert_eq!(buffer, targets.spherical);
        assert_eq!(animator.blend(), 1.0);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let targets = targets();
        let mut buffer = vec![Vec3::ZERO; 3];
        let mut animator = MorphAnimator::default();
        assert_eq!(
            animator.tick(0.1, &targets, &mut buffer),
            Err(GeodesicError::TargetLengthMismatch {
                buffer: 3,
                spherical: 82,
                flattened: 82,
            })
        );
        assert_eq!(animator.progress(), 0.0);
    }

    #[test]
    fn mismatched_targets_are_rejected() {
        assert!(MorphTargets::new(vec![Vec3::X], vec![]).is_err());
    }

    #[test]
    fn blend_matches_endpoints() {
        let targets = targets();
        let mut buffer = vec![Vec3::ZERO; targets.len()];
        targets.blend_into(MorphState::Flattening, 0.0, &mut buffer);
        assert_eq!(buffer, targets.spherical);
        targets.blend_into(MorphState::Flattening, 1.0, &mut buffer);
        assert_eq!(buffer, targets.flattened);
        targets.blend_into(MorphState::Unflattening, 2.0, &mut buffer);
        assert_eq!(buffer, targets.spherical);
    }

    #[test]
    fn hitch_past_the_hold_still_lands_on_target() {
        let targets = targets();
        let mut buffer = targets.flattened.clone();
        let mut animator = MorphAnimator::new(MorphState::Unflattening, 1.0);

        assert_eq!(animator.tick(0.9, &targets, &mut buffer), Ok(true));
        assert_ne!(buffer, targets.spherical);

        // 0.9 + 1.3 jumps over the whole hold
        assert_eq!(animator.tick(1.3, &targets, &mut buffer), Ok(true));
        assert_eq!(buffer, targets.spherical);
        assert_eq!(animator.state(), MorphState::Flattening);
        assert_eq!(animator.progress(), 0.0);

        assert_eq!(animator.tick(1.0, &targets, &mut buffer), Ok(true));
        assert_eq!(buffer, targets.flattened);
    }
}
