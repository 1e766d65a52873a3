use crate::entrance::EntranceFrame;
use crate::projection::{self, ItemFrame, Point, Rect};
use crate::ring::{ImageRef, ItemTransform, Ring, RingError};
use crate::settings::RingSettings;
use crate::settle::{AnimationToken, Sample, Settle};
use std::fmt;
use std::time::Duration;
use strum::{Display as StrumDisplay, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum PhaseKind {
    Idle,
    Dragging,
    Settling,
}

/// Pointer cursor names, matching the CSS/GTK cursor vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum CursorShape {
    Default,
    Grab,
    Grabbing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub last_x: f64,
    /// Rotation produced by the most recent pointer delta only.
    pub velocity: f64,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Dragging(DragSession),
    Settling(Settle),
}

impl Phase {
    fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Dragging(_) => PhaseKind::Dragging,
            Phase::Settling(_) => PhaseKind::Settling,
        }
    }
}

/// Outcome of feeding one frame to [`Carousel::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    /// The settle reached its snapped target; reported once.
    Settled(usize),
    /// The token does not belong to the running settle.
    Stale,
}

struct ActiveTracker {
    last: usize,
    notify: Box<dyn FnMut(usize)>,
}

impl ActiveTracker {
    fn observe(&mut self, index: usize) {
        if index != self.last {
            self.last = index;
            (self.notify)(index);
        }
    }
}

/// Rotation state of a ring of images.
///
/// Exactly one writer moves the angle at a time: pointer moves while
/// [`PhaseKind::Dragging`], frame ticks while [`PhaseKind::Settling`].
pub struct Carousel {
    ring: Ring,
    settings: RingSettings,
    angle: f64,
    scale: f64,
    phase: Phase,
    token: AnimationToken,
    hovered: Option<usize>,
    active: ActiveTracker,
}

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("items", &self.ring.len())
            .field("angle", &self.angle)
            .field("scale", &self.scale)
            .field("phase", &self.phase.kind())
            .field("active", &self.active.last)
            .finish()
    }
}

impl Carousel {
    /// Validates `settings`, builds the ring and reports the initial active index.
    pub fn initialize(
        images: Vec<ImageRef>,
        settings: RingSettings,
        on_active_change: impl FnMut(usize) + 'static,
    ) -> Result<Self, RingError> {
        settings.validate()?;
        let ring = Ring::with_step(images, settings.angular_step)?;
        Ok(Self::new(ring, settings, on_active_change))
    }

    pub fn new(
        ring: Ring,
        settings: RingSettings,
        on_active_change: impl FnMut(usize) + 'static,
    ) -> Self {
        let angle = settings.initial_rotation;
        let initial = ring.active_index(angle);
        let mut notify: Box<dyn FnMut(usize)> = Box::new(on_active_change);
        notify(initial);

        log::debug!(
            "ring of {} items, step {} deg, starting at {} deg (item {})",
            ring.len(),
            ring.step(),
            angle,
            initial
        );

        Self {
            ring,
            settings,
            angle,
            scale: 1.0,
            phase: Phase::Idle,
            token: AnimationToken::from(0),
            hovered: None,
            active: ActiveTracker {
                last: initial,
                notify,
            },
        }
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn settings(&self) -> &RingSettings {
        &self.settings
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn active_index(&self) -> usize {
        self.active.last
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match &self.phase {
            Phase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn cursor(&self) -> CursorShape {
        match (&self.phase, self.settings.draggable) {
            (_, false) => CursorShape::Default,
            (Phase::Dragging(_), true) => CursorShape::Grabbing,
            (_, true) => CursorShape::Grab,
        }
    }

    /// Starts a drag at `x`. Any running settle is dropped without completing.
    ///
    /// Returns `false`, leaving every phase untouched, when dragging is disabled.
    pub fn pointer_down(&mut self, x: f64) -> bool {
        if !self.settings.draggable {
            return false;
        }
        if let Phase::Settling(settle) = &self.phase {
            log::trace!("drag interrupts settle {}", settle.token());
        }
        self.phase = Phase::Dragging(DragSession {
            last_x: x,
            velocity: 0.0,
        });
        self.hovered = None;
        true
    }

    pub fn pointer_move(&mut self, x: f64) {
        let Phase::Dragging(session) = &mut self.phase else {
            return;
        };
        let delta = x - session.last_x;
        let velocity = delta * self.settings.drag_sensitivity;
        session.velocity = velocity;
        session.last_x = x;
        self.angle += velocity;
        self.refresh_active();
    }

    /// Ends the drag. Returns the token of the momentum settle when one starts.
    pub fn pointer_up(&mut self) -> Option<AnimationToken> {
        let Phase::Dragging(session) = &self.phase else {
            return None;
        };
        let velocity = session.velocity;

        if velocity == 0.0 {
            // no momentum, so the ring stays wherever the drag left it
            self.phase = Phase::Idle;
            return None;
        }

        let token = self.next_token();
        let settle = Settle::fling(
            token,
            self.angle,
            velocity,
            &self.settings.inertia,
            &self.ring,
        );
        log::trace!(
            "settle {} from {:.2} to {:.2} deg",
            token,
            settle.origin(),
            settle.target()
        );
        self.phase = Phase::Settling(settle);
        Some(token)
    }

    /// Abandons the drag without momentum.
    pub fn pointer_cancel(&mut self) {
        if self.is_dragging() {
            self.phase = Phase::Idle;
        }
    }

    /// Advances the settle identified by `token` to the frame at `now`.
    pub fn tick(&mut self, token: AnimationToken, now: Duration) -> Tick {
        let Phase::Settling(settle) = &mut self.phase else {
            return Tick::Stale;
        };
        if settle.token() != token {
            return Tick::Stale;
        }

        let sample = settle.sample(now);
        self.angle = sample.angle();
        self.refresh_active();

        match sample {
            Sample::Moving(_) => Tick::Running,
            Sample::Done(_) => {
                self.phase = Phase::Idle;
                log::trace!("settle {} done at {} deg", token, self.angle);
                Tick::Settled(self.active.last)
            }
        }
    }

    /// Settles onto the item `offset` positions after the current one.
    ///
    /// Counts from the running settle's target so repeated steps accumulate.
    /// Ignored while dragging.
    pub fn step_by(&mut self, offset: i64) -> Option<AnimationToken> {
        let base = self.settle_base()?;
        let target = base - offset as f64 * self.ring.step();
        self.settle_to(target)
    }

    /// Settles so that `index` faces the front, taking the shorter way round.
    ///
    /// While settling, the way round is measured from the running settle's target.
    pub fn settle_on(&mut self, index: usize) -> Option<AnimationToken> {
        if index >= self.ring.len() {
            return None;
        }
        let base = self.settle_base()?;
        let target = self.ring.angle_for(index, base);
        self.settle_to(target)
    }

    /// Step-aligned angle that keyboard and programmatic moves count from.
    fn settle_base(&self) -> Option<f64> {
        match &self.phase {
            Phase::Dragging(_) => None,
            Phase::Settling(settle) => Some(settle.target()),
            Phase::Idle => Some(self.ring.snap(self.angle)),
        }
    }

    fn settle_to(&mut self, target: f64) -> Option<AnimationToken> {
        let token = self.next_token();
        self.phase = Phase::Settling(Settle::toward(
            token,
            self.angle,
            target,
            &self.settings.inertia,
        ));
        Some(token)
    }

    /// Sets the angle directly, dropping any drag or settle.
    pub fn jump_to(&mut self, angle: f64) {
        self.phase = Phase::Idle;
        self.angle = angle;
        self.refresh_active();
    }

    /// Stops a running settle where it is, without completing it.
    pub fn cancel(&mut self) {
        if let Phase::Settling(settle) = &self.phase {
            log::trace!("settle {} cancelled", settle.token());
            self.phase = Phase::Idle;
        }
    }

    /// Applies the responsive breakpoint. Returns whether the scale changed.
    pub fn set_viewport_width(&mut self, width: f64) -> bool {
        let scale = self.settings.responsive.scale_for(width);
        let changed = scale != self.scale;
        self.scale = scale;
        changed
    }

    pub fn hover(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.ring.len());
        let changed = self.hovered != index;
        self.hovered = index;
        changed
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Hovering a card other than the active one dims all the rest.
    pub fn item_opacity(&self, index: usize) -> f64 {
        match self.hovered {
            Some(h) if !self.is_dragging() && h != self.active.last && h != index => {
                self.settings.hover_opacity
            }
            _ => 1.0,
        }
    }

    pub fn item_transform(&self, index: usize) -> ItemTransform {
        self.ring
            .item_transform(index, self.angle, self.scaled_distance())
    }

    fn scaled_distance(&self) -> f64 {
        self.settings.image_distance * self.scale
    }

    /// Visible cards in paint order, positioned relative to the stage centre.
    pub fn frames(&self, entrance: impl Fn(usize) -> EntranceFrame) -> Vec<ItemFrame> {
        let card_width = self.settings.width * self.scale;
        let card_height = self.settings.image_height() * self.scale;

        let mut frames: Vec<ItemFrame> = (0..self.ring.len())
            .filter_map(|index| {
                let transform = self.item_transform(index);
                let p = projection::project(
                    transform.effective_rotation,
                    self.scaled_distance(),
                    self.settings.perspective,
                );
                if !p.facing {
                    return None;
                }
                let enter = entrance(index);
                let center = Point::new(p.x, enter.rise_offset * self.scale);
                Some(ItemFrame {
                    index,
                    transform,
                    rect: Rect::centered(
                        center,
                        card_width * p.scale * p.squash,
                        card_height * p.scale,
                    ),
                    depth: p.depth,
                    background_offset: transform.background_offset * p.scale,
                    opacity: self.item_opacity(index) * enter.opacity,
                    active: index == self.active.last,
                })
            })
            .collect();

        projection::sort_for_painting(&mut frames);
        frames
    }

    fn refresh_active(&mut self) {
        let index = self.ring.active_index(self.angle);
        self.active.observe(index);
    }

    fn next_token(&mut self) -> AnimationToken {
        self.token = self.token.next();
        self.token
    }
}
