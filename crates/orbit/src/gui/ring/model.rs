use super::IMAGE_LOAD_WIDTH;
use crate::config::{self, Config, HexColor, ItemConfig};
use gdk_pixbuf::Pixbuf;
use spindle::{Carousel, Entrance, EntranceFrame, ItemFrame, Point, RingError, projection};
use std::path::Path;
use std::time::Duration;

#[derive(Clone)]
pub struct Card {
    pub item: ItemConfig,
    pub pixbuf: Option<Pixbuf>,
}

impl Card {
    pub fn load(item: &ItemConfig, config_path: &Path) -> Self {
        let path = config::image_path(&item.image, config_path);
        let pixbuf = match Pixbuf::from_file_at_scale(&path, IMAGE_LOAD_WIDTH, -1, true) {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("Failed to load image {}: {}", path.display(), e);
                None
            }
        };
        Self {
            item: item.clone(),
            pixbuf,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Caption {
    pub position: String,
    pub title: String,
    pub description: String,
    pub tags: String,
}

impl Caption {
    pub fn for_item(item: &ItemConfig, index: usize, count: usize) -> Self {
        Self {
            position: format!("{} / {}", index + 1, count),
            title: item.title.clone(),
            description: item.description.clone(),
            tags: item.tags.join(" · "),
        }
    }
}

pub struct RingModel {
    pub carousel: Carousel,
    pub cards: Vec<Card>,
    pub background: Option<HexColor>,
    entrance: Entrance,
    entrance_started: Option<Duration>,
    entrance_elapsed: Duration,
}

impl RingModel {
    /// Fails on an empty item list before any image is loaded.
    pub fn from_config(
        config: &Config,
        config_path: &Path,
        on_active_change: impl FnMut(usize) + 'static,
    ) -> Result<Self, RingError> {
        let carousel =
            Carousel::initialize(config.images(), config.ring.clone(), on_active_change)?;
        let cards = config
            .items
            .iter()
            .map(|item| Card::load(item, config_path))
            .collect();

        Ok(Self {
            entrance: Entrance::new(config.ring.entrance),
            carousel,
            cards,
            background: config.window.background,
            entrance_started: None,
            entrance_elapsed: Duration::ZERO,
        })
    }

    pub fn caption(&self, index: usize) -> Caption {
        self.cards
            .get(index)
            .map(|c| Caption::for_item(&c.item, index, self.cards.len()))
            .unwrap_or_default()
    }

    pub fn restart_entrance(&mut self) {
        self.entrance_started = None;
        self.entrance_elapsed = Duration::ZERO;
    }

    /// Moves the entrance clock to `now`. Returns `true` once every card is in place.
    pub fn advance_entrance(&mut self, now: Duration) -> bool {
        let started = *self.entrance_started.get_or_insert(now);
        self.entrance_elapsed = now.saturating_sub(started);
        self.entrance
            .is_finished(self.cards.len(), self.entrance_elapsed)
    }

    pub fn entrance_frame(&self, index: usize) -> EntranceFrame {
        self.entrance.frame(index, self.entrance_elapsed)
    }

    pub fn frames(&self) -> Vec<ItemFrame> {
        self.carousel.frames(|i| self.entrance_frame(i))
    }

    /// Card under `point` in drawing area coordinates with the stage centred at `center`.
    pub fn card_at(&self, point: Point, center: Point) -> Option<usize> {
        let local = Point::new(point.x - center.x, point.y - center.y);
        projection::hit_test(&self.frames(), local)
    }
}

pub fn stage_center(width: f64, height: f64) -> Point {
    Point::new(width / 2.0, height / 2.0)
}
