// Cosmetic effects attached after each render pass.
// Tilt, staggered entrance, scroll reveal and selection particle bursts.

use std::time::{Duration, Instant};

use crate::error::{EcoError, Result};
use crate::render::CatalogView;

pub const TILT_MAX_DEGREES: u8 = 18;
pub const TILT_SPEED: Duration = Duration::from_millis(450);
pub const TILT_MAX_GLARE: f32 = 0.28;
pub const ENTRANCE_STAGGER: Duration = Duration::from_millis(40);
pub const ENTRANCE_DURATION: Duration = Duration::from_millis(400);
pub const BURST_LIFETIME: Duration = Duration::from_millis(600);
pub const BURST_PARTICLES: usize = 6;

/// Stagger steps after which tiles share the same delay.
const MAX_STAGGER_STEPS: u32 = 12;
const PARTICLE_GLYPHS: [char; 4] = ['✦', '✧', '·', '*'];
const PARTICLE_FRAME: Duration = Duration::from_millis(100);

/// Hover tilt parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltConfig {
    pub max_degrees: u8,
    pub speed: Duration,
    pub glare: bool,
    pub max_glare: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_degrees: TILT_MAX_DEGREES,
            speed: TILT_SPEED,
            glare: true,
            max_glare: TILT_MAX_GLARE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectsConfig {
    pub tilt: TiltConfig,
    pub stagger: Duration,
    pub entrance: Duration,
    pub burst_lifetime: Duration,
    pub particles: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            tilt: TiltConfig::default(),
            stagger: ENTRANCE_STAGGER,
            entrance: ENTRANCE_DURATION,
            burst_lifetime: BURST_LIFETIME,
            particles: BURST_PARTICLES,
        }
    }
}

impl EffectsConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=90).contains(&self.tilt.max_degrees) {
            return Err(EcoError::Effect(format!(
                "tilt angle {} out of range 1..=90",
                self.tilt.max_degrees
            )));
        }
        if !(0.0..=1.0).contains(&self.tilt.max_glare) {
            return Err(EcoError::Effect(format!(
                "glare {} out of range 0..=1",
                self.tilt.max_glare
            )));
        }
        if self.entrance.is_zero() {
            return Err(EcoError::Effect("entrance duration must be positive".into()));
        }
        Ok(())
    }
}

/// Per-tile effect data, in view tile order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFx {
    /// Delay before the entrance animation starts.
    pub entrance_delay: Duration,
    /// Whether the tile waits to be scrolled into view before animating.
    pub reveal: bool,
}

/// Effects computed for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decorations {
    pub tiles: Vec<TileFx>,
    pub tilt: Option<TiltConfig>,
    pub entrance: Duration,
}

impl Decorations {
    pub fn tile(&self, index: usize) -> Option<&TileFx> {
        self.tiles.get(index)
    }
}

/// Compute decorations for `view`.
///
/// Tiles are staggered within their group; every group after the first is
/// revealed on scroll.
pub fn attach(view: &CatalogView, config: &EffectsConfig) -> Result<Decorations> {
    config.validate()?;

    let tiles = view
        .groups()
        .iter()
        .enumerate()
        .flat_map(|(group_index, group)| {
            (0..group.tiles.len()).map(move |index| TileFx {
                entrance_delay: config.stagger * (index as u32).min(MAX_STAGGER_STEPS),
                reveal: group_index > 0,
            })
        })
        .collect();

    Ok(Decorations {
        tiles,
        tilt: Some(config.tilt),
        entrance: config.entrance,
    })
}

/// Entrance animation progress for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    FadingIn,
    Shown,
}

/// Where a tile is in its entrance, given when its group started animating.
pub fn entrance_phase(fx: &TileFx, started: Instant, entrance: Duration, now: Instant) -> Phase {
    let elapsed = now.saturating_duration_since(started);
    if elapsed < fx.entrance_delay {
        Phase::Hidden
    } else if elapsed < fx.entrance_delay + entrance {
        Phase::FadingIn
    } else {
        Phase::Shown
    }
}

/// Short particle burst on a newly selected tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    pub tile: usize,
    pub started: Instant,
}

impl Burst {
    pub fn new(tile: usize, now: Instant) -> Self {
        Self { tile, started: now }
    }

    pub fn is_alive(&self, lifetime: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.started) < lifetime
    }

    /// Particle glyphs for the current frame, None once the burst has faded.
    pub fn particles(&self, config: &EffectsConfig, now: Instant) -> Option<String> {
        if !self.is_alive(config.burst_lifetime, now) {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let frame = (elapsed.as_millis() / PARTICLE_FRAME.as_millis()) as usize;
        // Particles thin out as the burst ages
        let remaining = config.burst_lifetime.saturating_sub(elapsed).as_millis() as usize;
        let count = (config.particles * remaining)
            .div_ceil(config.burst_lifetime.as_millis().max(1) as usize)
            .max(1);

        let particles: Vec<String> = (0..count)
            .map(|i| PARTICLE_GLYPHS[(frame + i) % PARTICLE_GLYPHS.len()].to_string())
            .collect();
        Some(particles.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, Item};
    use crate::render::render_categorized;

    fn view() -> CatalogView {
        let items = |n: usize| {
            (0..n)
                .map(|i| Item {
                    name: format!("p{i}"),
                    ..Default::default()
                })
                .collect()
        };
        render_categorized(&Catalog::new(vec![
            Category::new("DeFi", items(3)),
            Category::new("NFT", items(2)),
        ]))
    }

    #[test]
    fn test_attach_staggers_within_groups() {
        let decorations = attach(&view(), &EffectsConfig::default()).unwrap();

        assert_eq!(decorations.tiles.len(), 5);
        assert_eq!(decorations.tiles[0].entrance_delay, Duration::ZERO);
        assert_eq!(decorations.tiles[2].entrance_delay, ENTRANCE_STAGGER * 2);
        // Second group restarts its stagger and waits for scroll
        assert_eq!(decorations.tiles[3].entrance_delay, Duration::ZERO);
        assert!(!decorations.tiles[0].reveal);
        assert!(decorations.tiles[3].reveal);
        assert_eq!(decorations.tilt, Some(TiltConfig::default()));
    }

    #[test]
    fn test_invalid_config_fails() {
        let mut config = EffectsConfig::default();
        config.tilt.max_glare = 1.5;
        assert!(matches!(attach(&view(), &config), Err(EcoError::Effect(_))));

        let mut config = EffectsConfig::default();
        config.tilt.max_degrees = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_matches_has_no_tiles() {
        let decorations = attach(&CatalogView::NoMatches, &EffectsConfig::default()).unwrap();
        assert!(decorations.tiles.is_empty());
    }

    #[test]
    fn test_entrance_phase() {
        let start = Instant::now();
        let fx = TileFx {
            entrance_delay: Duration::from_millis(80),
            reveal: false,
        };
        let entrance = Duration::from_millis(400);

        assert_eq!(entrance_phase(&fx, start, entrance, start), Phase::Hidden);
        assert_eq!(
            entrance_phase(&fx, start, entrance, start + Duration::from_millis(100)),
            Phase::FadingIn
        );
        assert_eq!(
            entrance_phase(&fx, start, entrance, start + Duration::from_millis(500)),
            Phase::Shown
        );
    }

    #[test]
    fn test_burst_fades_out() {
        let config = EffectsConfig::default();
        let start = Instant::now();
        let burst = Burst::new(2, start);

        let first = burst.particles(&config, start).unwrap();
        assert_eq!(first.split(' ').count(), BURST_PARTICLES);

        let late = burst
            .particles(&config, start + Duration::from_millis(550))
            .unwrap();
        assert!(late.split(' ').count() < BURST_PARTICLES);

        assert!(burst.particles(&config, start + BURST_LIFETIME).is_none());
    }
}
