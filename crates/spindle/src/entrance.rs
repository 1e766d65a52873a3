use crate::settings::EntranceSettings;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceFrame {
    pub opacity: f64,
    /// Pixels below the rest position, before responsive scaling.
    pub rise_offset: f64,
}

impl EntranceFrame {
    pub const RESTING: Self = Self {
        opacity: 1.0,
        rise_offset: 0.0,
    };
}

/// Staggered rise-and-fade of the cards when the ring first appears.
#[derive(Debug, Clone, Copy)]
pub struct Entrance {
    settings: EntranceSettings,
}

impl Entrance {
    pub fn new(settings: EntranceSettings) -> Self {
        Self { settings }
    }

    /// Eased progress of card `index` at `elapsed` since the ring appeared.
    pub fn progress(&self, index: usize, elapsed: Duration) -> f64 {
        let delay = index as f64 * self.settings.stagger;
        let local = elapsed.as_secs_f64() - delay;
        if local <= 0.0 {
            return 0.0;
        }
        if self.settings.duration <= 0.0 {
            return 1.0;
        }
        self.settings
            .easing
            .transform((local / self.settings.duration).min(1.0))
    }

    pub fn frame(&self, index: usize, elapsed: Duration) -> EntranceFrame {
        let p = self.progress(index, elapsed);
        EntranceFrame {
            opacity: p,
            rise_offset: self.settings.rise * (1.0 - p),
        }
    }

    pub fn total_duration(&self, count: usize) -> Duration {
        let last_delay = count.saturating_sub(1) as f64 * self.settings.stagger;
        // durations too long for a Duration never finish
        Duration::try_from_secs_f64(last_delay + self.settings.duration).unwrap_or(Duration::MAX)
    }

    pub fn is_finished(&self, count: usize, elapsed: Duration) -> bool {
        elapsed >= self.total_duration(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    fn linear() -> Entrance {
        Entrance::new(EntranceSettings {
            duration: 1.0,
            stagger: 0.5,
            easing: Easing::Linear,
            rise: 200.0,
        })
    }

    #[test]
    fn test_cards_start_hidden_below() {
        let entrance = Entrance::new(EntranceSettings::default());
        let frame = entrance.frame(0, Duration::ZERO);
        assert_eq!(frame.opacity, 0.0);
        assert_eq!(frame.rise_offset, 200.0);
    }

    #[test]
    fn test_stagger_delays_later_cards() {
        let entrance = linear();
        let at = Duration::from_millis(750);
        assert!((entrance.progress(0, at) - 0.75).abs() < 1e-9);
        assert!((entrance.progress(1, at) - 0.25).abs() < 1e-9);
        assert_eq!(entrance.progress(2, at), 0.0);
    }

    #[test]
    fn test_entrance_finishes_after_last_card() {
        let entrance = linear();
        assert_eq!(entrance.total_duration(4), Duration::from_secs_f64(2.5));
        assert!(!entrance.is_finished(4, Duration::from_secs(2)));
        assert!(entrance.is_finished(4, Duration::from_secs(3)));
        assert_eq!(
            entrance.frame(3, Duration::from_secs(3)),
            EntranceFrame::RESTING
        );
    }

    #[test]
    fn test_huge_duration_never_finishes() {
        let entrance = Entrance::new(EntranceSettings {
            duration: 1e20,
            ..EntranceSettings::default()
        });
        assert_eq!(entrance.total_duration(3), Duration::MAX);
        assert!(!entrance.is_finished(3, Duration::from_secs(3600)));
        assert!(entrance.frame(0, Duration::from_secs(3600)).rise_offset > 0.0);
    }

    #[test]
    fn test_zero_duration_shows_cards_at_once() {
        let entrance = Entrance::new(EntranceSettings {
            duration: 0.0,
            stagger: 0.0,
            ..EntranceSettings::default()
        });
        assert_eq!(
            entrance.frame(5, Duration::from_millis(1)),
            EntranceFrame::RESTING
        );
    }
}
