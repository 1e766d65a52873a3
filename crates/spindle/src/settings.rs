use crate::easing::Easing;
use crate::ring::RingError;
use serde::{Deserialize, Serialize};

/// Stage height relative to image height, leaving room for the entrance rise.
pub const STAGE_HEIGHT_FACTOR: f64 = 1.33;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RingSettings {
    /// Card width in pixels before responsive scaling.
    pub width: f64,
    pub perspective: f64,
    /// Radius of the ring, i.e. how far each card sits from the rotation axis.
    pub image_distance: f64,
    pub initial_rotation: f64,
    /// Degrees between neighbours; `None` spreads the items over a full turn.
    pub angular_step: Option<f64>,
    pub image_aspect_ratio: f64,
    pub draggable: bool,
    /// Degrees of rotation per pixel of horizontal drag.
    pub drag_sensitivity: f64,
    /// Opacity of the other cards while a non-active card is hovered.
    pub hover_opacity: f64,
    pub entrance: EntranceSettings,
    pub inertia: Inertia,
    pub responsive: Responsive,
}

impl Default for RingSettings {
    fn default() -> Self {
        Self {
            width: 300.0,
            perspective: 2000.0,
            image_distance: 500.0,
            initial_rotation: 180.0,
            angular_step: None,
            image_aspect_ratio: 16.0 / 9.0,
            draggable: true,
            drag_sensitivity: 0.5,
            hover_opacity: 0.5,
            entrance: EntranceSettings::default(),
            inertia: Inertia::default(),
            responsive: Responsive::default(),
        }
    }
}

impl RingSettings {
    pub fn image_height(&self) -> f64 {
        self.width / self.image_aspect_ratio
    }

    pub fn stage_height(&self) -> f64 {
        self.image_height() * STAGE_HEIGHT_FACTOR
    }

    pub fn validate(&self) -> Result<(), RingError> {
        positive("width", self.width)?;
        positive("perspective", self.perspective)?;
        positive("image_aspect_ratio", self.image_aspect_ratio)?;
        positive("inertia.time_constant_ms", self.inertia.time_constant_ms)?;
        positive("responsive.scale_factor", self.responsive.scale_factor)?;
        positive("inertia.rest_delta", self.inertia.rest_delta)?;
        non_negative("image_distance", self.image_distance)?;
        non_negative("inertia.power", self.inertia.power)?;
        non_negative("inertia.velocity_multiplier", self.inertia.velocity_multiplier)?;
        non_negative("entrance.duration", self.entrance.duration)?;
        non_negative("entrance.stagger", self.entrance.stagger)?;
        finite("initial_rotation", self.initial_rotation)?;
        finite("drag_sensitivity", self.drag_sensitivity)?;
        finite("entrance.rise", self.entrance.rise)?;

        if !(0.0..=1.0).contains(&self.hover_opacity) {
            return Err(invalid(format!(
                "hover_opacity must be within [0, 1], got {}",
                self.hover_opacity
            )));
        }
        if let Some(step) = self.angular_step {
            positive("angular_step", step)?;
        }
        if self.image_distance >= self.perspective {
            return Err(invalid(format!(
                "image_distance ({}) must stay below perspective ({})",
                self.image_distance, self.perspective
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EntranceSettings {
    /// Seconds each card takes to rise into place.
    pub duration: f64,
    /// Seconds between the starts of neighbouring cards.
    pub stagger: f64,
    pub easing: Easing,
    /// Pixels below the rest position a card starts from.
    pub rise: f64,
}

impl Default for EntranceSettings {
    fn default() -> Self {
        Self {
            duration: 1.5,
            stagger: 0.1,
            easing: Easing::EaseOut,
            rise: 200.0,
        }
    }
}

/// Momentum applied after a drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Inertia {
    pub power: f64,
    pub time_constant_ms: f64,
    pub velocity_multiplier: f64,
    /// Remaining distance in degrees at which the settle jumps onto its target.
    pub rest_delta: f64,
}

impl Default for Inertia {
    fn default() -> Self {
        Self {
            power: 0.8,
            time_constant_ms: 300.0,
            velocity_multiplier: 20.0,
            rest_delta: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Responsive {
    /// Viewport widths at or below this use `scale_factor`.
    pub breakpoint: f64,
    pub scale_factor: f64,
}

impl Default for Responsive {
    fn default() -> Self {
        Self {
            breakpoint: 768.0,
            scale_factor: 0.8,
        }
    }
}

impl Responsive {
    pub fn scale_for(&self, viewport_width: f64) -> f64 {
        if viewport_width <= self.breakpoint {
            self.scale_factor
        } else {
            1.0
        }
    }
}

fn invalid(reason: String) -> RingError {
    RingError::InvalidConfiguration(reason)
}

fn finite(name: &str, value: f64) -> Result<(), RingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite, got {value}")))
    }
}

fn positive(name: &str, value: f64) -> Result<(), RingError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), RingError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must not be negative, got {value}")))
    }
}
