use crate::ring::Ring;
use crate::settings::Inertia;
use derive_more::{Display, From, Into};
use std::time::Duration;

/// Identifies one settle animation. Frames carrying an older token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct AnimationToken(u64);

impl AnimationToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Moving(f64),
    Done(f64),
}

impl Sample {
    pub fn angle(&self) -> f64 {
        match *self {
            Sample::Moving(a) | Sample::Done(a) => a,
        }
    }
}

/// Exponential decay from `origin` onto a snapped `target`.
///
/// Position at `t` ms after the first frame is
/// `target - amplitude * exp(-t / time_constant)`; once the remaining distance
/// drops to `rest_delta` the animation lands on `target` exactly.
#[derive(Debug, Clone)]
pub struct Settle {
    token: AnimationToken,
    origin: f64,
    target: f64,
    amplitude: f64,
    time_constant_ms: f64,
    rest_delta: f64,
    started_at: Option<Duration>,
}

impl Settle {
    /// Momentum after a release at `velocity` degrees per pointer event.
    pub fn fling(
        token: AnimationToken,
        origin: f64,
        velocity: f64,
        inertia: &Inertia,
        ring: &Ring,
    ) -> Self {
        let boosted = velocity * inertia.velocity_multiplier;
        let ideal = origin + inertia.power * boosted;
        Self::toward(token, origin, ring.snap(ideal), inertia)
    }

    pub fn toward(token: AnimationToken, origin: f64, target: f64, inertia: &Inertia) -> Self {
        Self {
            token,
            origin,
            target,
            amplitude: target - origin,
            time_constant_ms: inertia.time_constant_ms,
            rest_delta: inertia.rest_delta,
            started_at: None,
        }
    }

    pub fn token(&self) -> AnimationToken {
        self.token
    }

    pub fn origin(&self) -> f64 {
        self.origin
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Samples the curve for a frame timestamp; the first call fixes the start time.
    pub fn sample(&mut self, now: Duration) -> Sample {
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed_ms = now.saturating_sub(started_at).as_secs_f64() * 1000.0;
        let delta = -self.amplitude * (-elapsed_ms / self.time_constant_ms).exp();

        if delta.abs() <= self.rest_delta {
            Sample::Done(self.target)
        } else {
            Sample::Moving(self.target + delta)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::ImageRef;

    fn ring(n: usize) -> Ring {
        Ring::new((0..n).map(|i| ImageRef::new(format!("{i}.jpg"))).collect()).unwrap()
    }

    fn run_to_end(settle: &mut Settle) -> (f64, usize) {
        let mut frames = 0;
        loop {
            let now = Duration::from_millis(16 * frames as u64);
            frames += 1;
            if let Sample::Done(angle) = settle.sample(now) {
                return (angle, frames);
            }
            assert!(frames < 10_000, "settle never finished");
        }
    }

    #[test]
    fn test_first_frame_starts_at_origin() {
        let inertia = Inertia::default();
        let mut settle = Settle::toward(AnimationToken::from(1), 10.0, 90.0, &inertia);
        let first = settle.sample(Duration::from_secs(42));
        assert_eq!(first, Sample::Moving(10.0));
    }

    #[test]
    fn test_fling_target_is_snapped() {
        let r = ring(7);
        let inertia = Inertia::default();
        for velocity in [-13.0, -2.5, -0.5, 0.25, 1.0, 4.0, 17.5] {
            for origin in [-400.0, -33.3, 0.0, 12.7, 181.0] {
                let mut settle =
                    Settle::fling(AnimationToken::from(0), origin, velocity, &inertia, &r);
                let (angle, _) = run_to_end(&mut settle);
                let remainder = (angle / r.step()).round() * r.step() - angle;
                assert!(remainder.abs() < 1e-9, "angle {angle} not on a step");
            }
        }
    }

    #[test]
    fn test_fling_follows_velocity_direction() {
        let r = ring(12);
        let inertia = Inertia::default();
        let forward = Settle::fling(AnimationToken::from(0), 0.0, 5.0, &inertia, &r);
        let backward = Settle::fling(AnimationToken::from(0), 0.0, -5.0, &inertia, &r);
        // 0.8 * 5 * 20 = 80 degrees, snapped to 90 with 30 degree steps
        assert_eq!(forward.target(), 90.0);
        assert_eq!(backward.target(), -90.0);
    }

    #[test]
    fn test_motion_decelerates() {
        let inertia = Inertia::default();
        let mut settle = Settle::toward(AnimationToken::from(0), 0.0, 180.0, &inertia);
        let mut last = settle.sample(Duration::ZERO).angle();
        let mut last_step = f64::INFINITY;
        for frame in 1..20 {
            let angle = settle.sample(Duration::from_millis(16 * frame)).angle();
            let step = angle - last;
            assert!(step > 0.0 && step < last_step);
            last_step = step;
            last = angle;
        }
    }

    #[test]
    fn test_tiny_amplitude_finishes_immediately() {
        let inertia = Inertia::default();
        let mut settle = Settle::toward(AnimationToken::from(0), 89.8, 90.0, &inertia);
        assert_eq!(settle.sample(Duration::ZERO), Sample::Done(90.0));
    }

    #[test]
    fn test_settle_finishes_within_time_constants() {
        let inertia = Inertia::default();
        let mut settle = Settle::toward(AnimationToken::from(0), 0.0, 360.0, &inertia);
        let (angle, frames) = run_to_end(&mut settle);
        assert_eq!(angle, 360.0);
        // ln(360 / 0.5) is about 6.6 time constants of 300 ms
        assert!(frames * 16 < 2200, "took {frames} frames");
    }
}
