use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FULL_TURN: f64 = 360.0;

/// Divisor applied to the parallax shift of an item background.
pub const PARALLAX_DIVISOR: f64 = 2.0;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RingError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Wraps an unbounded angle in degrees into `[0, 360)`.
pub fn normalize(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemTransform {
    /// Placement around the vertical axis, `index * step`.
    pub rotation: f64,
    /// Distance pushed away from the viewer, always `<= 0`.
    pub depth: f64,
    /// `angle + rotation` wrapped into `[0, 360)`.
    pub effective_rotation: f64,
    /// Horizontal background shift faking parallax, always `<= 0`.
    pub background_offset: f64,
}

#[derive(Debug, Clone)]
pub struct Ring {
    images: Vec<ImageRef>,
    step: f64,
}

impl Ring {
    pub fn new(images: Vec<ImageRef>) -> Result<Self, RingError> {
        Self::with_step(images, None)
    }

    /// Builds a ring with an explicit angular step, or `360 / len` when `step` is `None`.
    pub fn with_step(images: Vec<ImageRef>, step: Option<f64>) -> Result<Self, RingError> {
        if images.is_empty() {
            return Err(RingError::InvalidConfiguration(
                "ring needs at least one image".to_string(),
            ));
        }

        let step = match step {
            Some(s) if !s.is_finite() || s <= 0.0 => {
                return Err(RingError::InvalidConfiguration(format!(
                    "angular step must be a positive number of degrees, got {s}"
                )));
            }
            Some(s) => s,
            None => FULL_TURN / images.len() as f64,
        };

        Ok(Self { images, step })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// A ring always holds at least one image.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// Index of the item closest to the front for `angle`.
    pub fn active_index(&self, angle: f64) -> usize {
        let n = self.images.len() as i64;
        let raw = ((FULL_TURN - normalize(angle)) / self.step).round() as i64;
        raw.rem_euclid(n) as usize
    }

    /// Nearest angle at which some item faces the front exactly.
    pub fn snap(&self, angle: f64) -> f64 {
        (angle / self.step).round() * self.step
    }

    /// Angle that puts `index` at the front, the fewest steps away from `near`.
    pub fn angle_for(&self, index: usize, near: f64) -> f64 {
        let n = self.images.len() as i64;
        let base = self.snap(near);
        let current = self.active_index(base) as i64;
        let mut offset = (index as i64 - current).rem_euclid(n);
        if offset > n / 2 {
            offset -= n;
        }
        base - offset as f64 * self.step
    }

    pub fn item_transform(&self, index: usize, angle: f64, distance: f64) -> ItemTransform {
        let rotation = index as f64 * self.step;
        let effective_rotation = normalize(angle + rotation);
        let parallax = effective_rotation / FULL_TURN * distance;

        ItemTransform {
            rotation,
            depth: -distance,
            effective_rotation,
            background_offset: -(parallax / PARALLAX_DIVISOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> Ring {
        Ring::new((0..n).map(|i| ImageRef::new(format!("img{i}.png"))).collect()).unwrap()
    }

    #[test]
    fn test_empty_ring_is_invalid() {
        let err = Ring::new(Vec::new()).unwrap_err();
        assert!(matches!(err, RingError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_explicit_step_must_be_positive() {
        let images = vec![ImageRef::new("a.png")];
        for bad in [0.0, -30.0, f64::NAN, f64::INFINITY] {
            assert!(Ring::with_step(images.clone(), Some(bad)).is_err());
        }
        assert_eq!(Ring::with_step(images, Some(45.0)).unwrap().step(), 45.0);
    }

    #[test]
    fn test_normalize_wraps_into_turn() {
        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(360.0), 0.0);
        assert_eq!(normalize(-90.0), 270.0);
        assert_eq!(normalize(725.0), 5.0);
        assert_eq!(normalize(-1e-18), 0.0);
    }

    #[test]
    fn test_active_index_stays_in_range() {
        for n in 1..=9 {
            let r = ring(n);
            let mut angle = -2000.0;
            while angle < 2000.0 {
                assert!(r.active_index(angle) < n, "n={n} angle={angle}");
                angle += 7.3;
            }
        }
    }

    #[test]
    fn test_active_index_for_negative_multi_turn_angle() {
        let r = ring(4);
        assert_eq!(r.step(), 90.0);
        // -725 wraps to 355, five degrees short of item 0
        assert_eq!(r.active_index(-725.0), 0);
        assert_eq!(r.active_index(-725.0), r.active_index(-725.0 + 3.0 * FULL_TURN));
    }

    #[test]
    fn test_active_index_follows_quarter_turns() {
        let r = ring(4);
        assert_eq!(r.active_index(-90.0), 1);
        assert_eq!(r.active_index(-180.0), 2);
        assert_eq!(r.active_index(90.0), 3);
        assert_eq!(r.active_index(180.0), 2);
        assert_eq!(r.active_index(0.0), 0);
    }

    #[test]
    fn test_single_image_ring_is_always_active() {
        let r = ring(1);
        assert_eq!(r.step(), 360.0);
        for angle in [-1000.0, -180.0, -0.1, 0.0, 33.0, 179.9, 180.0, 720.5] {
            assert_eq!(r.active_index(angle), 0);
        }
    }

    #[test]
    fn test_snap_lands_on_step_multiples() {
        let r = ring(6);
        assert_eq!(r.snap(29.0), 0.0);
        assert_eq!(r.snap(31.0), 60.0);
        assert_eq!(r.snap(-95.0), -120.0);
    }

    #[test]
    fn test_angle_for_puts_item_in_front() {
        let r = ring(5);
        for index in 0..5 {
            let angle = r.angle_for(index, 1234.0);
            assert_eq!(r.active_index(angle), index);
            assert!((angle - r.snap(1234.0)).abs() <= 2.0 * r.step());
        }
    }

    #[test]
    fn test_angle_for_counts_from_the_given_angle() {
        let r = ring(6);
        // -180 faces item 3, so item 1 is two steps the other way
        assert_eq!(r.angle_for(1, -180.0), -60.0);
        assert_eq!(r.angle_for(5, -180.0), -300.0);
        assert_eq!(r.angle_for(3, -185.0), -180.0);
    }

    #[test]
    fn test_item_transform_is_pure() {
        let r = ring(4);
        assert_eq!(
            r.item_transform(2, -137.5, 500.0),
            r.item_transform(2, -137.5, 500.0)
        );
    }

    #[test]
    fn test_item_transform_places_items_evenly() {
        let r = ring(4);
        let t = r.item_transform(3, 0.0, 400.0);
        assert_eq!(t.rotation, 270.0);
        assert_eq!(t.depth, -400.0);
        assert_eq!(t.effective_rotation, 270.0);
        assert_eq!(t.background_offset, -(270.0 / 360.0 * 400.0) / PARALLAX_DIVISOR);
    }

    #[test]
    fn test_parallax_grows_with_rotation_from_front() {
        let r = ring(4);
        let mut previous = 0.0_f64;
        // item 0 sweeps from the front through one full turn
        for step in 1..360 {
            let offset = r.item_transform(0, step as f64, 500.0).background_offset;
            assert!(offset.abs() > previous.abs());
            assert!((offset.abs() - previous.abs()) < 1.0, "jump at {step}");
            previous = offset;
        }
        // and jumps back to zero at the wraparound
        assert_eq!(r.item_transform(0, 360.0, 500.0).background_offset, 0.0);
    }
}
