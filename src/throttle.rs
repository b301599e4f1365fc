//! Shared tick-rate policy.
//!
//! Every per-tick component runs its logic on the same frames. When logic
//! runs on every `divisor`-th frame only, each integrating component scales
//! its per-tick displacement by the divisor so apparent speed is unchanged.
//! Components driven by elapsed time (the water surface) need no scaling.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::TICK_DIVISOR;

/// How often per-tick logic runs relative to rendered frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickPolicy {
    /// Logic runs on every `divisor`-th frame. `1` runs every frame.
    pub divisor: u32,
}

impl Default for TickPolicy {
    fn default() -> Self {
        Self {
            divisor: TICK_DIVISOR,
        }
    }
}

impl TickPolicy {
    /// Logic on every frame, no compensation.
    #[must_use]
    pub const fn every_frame() -> Self {
        Self { divisor: 1 }
    }

    /// Logic on every `divisor`-th frame.
    #[must_use]
    pub const fn every_nth(divisor: u32) -> Self {
        Self { divisor }
    }

    const fn effective_divisor(self) -> u32 {
        if self.divisor == 0 {
            1
        } else {
            self.divisor
        }
    }

    /// Displacement multiplier for integrating components.
    ///
    /// Always equal to the divisor the throttle fires on, so skipped frames
    /// are made up exactly.
    #[expect(
        clippy::cast_precision_loss,
        reason = "Validated divisors never exceed MAX_TICK_DIVISOR, well inside the f32 mantissa."
    )]
    #[must_use]
    pub const fn displacement_scale(self) -> f32 {
        self.effective_divisor() as f32
    }
}

/// A frame on which logic runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStep {
    /// Number of logic ticks so far, this one included.
    pub tick: u64,
    /// Multiplier for per-tick displacement.
    pub scale: f32,
}

/// Frame counter applying a [`TickPolicy`].
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FrameThrottle {
    policy: TickPolicy,
    frame: u64,
    tick: u64,
    current: Option<TickStep>,
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(TickPolicy::default())
    }
}

impl FrameThrottle {
    /// Creates a throttle that has seen no frames yet.
    #[must_use]
    pub const fn new(policy: TickPolicy) -> Self {
        Self {
            policy,
            frame: 0,
            tick: 0,
            current: None,
        }
    }

    /// Counts one rendered frame and reports whether logic runs on it.
    ///
    /// With a divisor of three, logic runs on frames 3, 6, 9 and so on.
    pub fn advance(&mut self) -> Option<TickStep> {
        self.frame += 1;
        self.current = if self.frame % u64::from(self.policy.effective_divisor()) == 0 {
            self.tick += 1;
            Some(TickStep {
                tick: self.tick,
                scale: self.policy.displacement_scale(),
            })
        } else {
            None
        };
        self.current
    }

    /// Result of the most recent [`Self::advance`].
    #[must_use]
    pub const fn current(&self) -> Option<TickStep> {
        self.current
    }

    /// Frames counted so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frame
    }

    /// The active policy.
    #[must_use]
    pub const fn policy(&self) -> TickPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn firing_frames(policy: TickPolicy, frames: u64) -> Vec<u64> {
        let mut throttle = FrameThrottle::new(policy);
        (1..=frames)
            .filter(|_| throttle.advance().is_some())
            .collect()
    }

    #[rstest]
    #[case(TickPolicy::every_frame(), vec![1, 2, 3, 4, 5, 6])]
    #[case(TickPolicy::every_nth(2), vec![2, 4, 6])]
    #[case(TickPolicy::every_nth(3), vec![3, 6])]
    #[case(TickPolicy::every_nth(0), vec![1, 2, 3, 4, 5, 6])]
    fn fires_on_every_nth_frame(#[case] policy: TickPolicy, #[case] expected: Vec<u64>) {
        assert_eq!(firing_frames(policy, 6), expected);
    }

    #[rstest]
    #[case(1, 1.0)]
    #[case(3, 3.0)]
    #[case(0, 1.0)]
    #[case(70_000, 70_000.0)]
    fn scale_compensates_skipped_frames(#[case] divisor: u32, #[case] scale: f32) {
        assert!((TickPolicy::every_nth(divisor).displacement_scale() - scale).abs() < f32::EPSILON);
    }

    #[test]
    fn current_tracks_last_advance() {
        let mut throttle = FrameThrottle::new(TickPolicy::every_nth(2));
        assert_eq!(throttle.advance(), None);
        assert_eq!(throttle.current(), None);
        let step = throttle.advance();
        assert_eq!(step, Some(TickStep { tick: 1, scale: 2.0 }));
        assert_eq!(throttle.current(), step);
        assert_eq!(throttle.frames(), 2);
    }
}
