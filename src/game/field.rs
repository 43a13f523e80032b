//! Static field geometry
//!
//! Perimeter walls, divider posts, hub structures and the derived bump
//! strips. Immutable once built.

use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::game::constants::field::*;
use crate::util::vec2::Vec2;

/// One of the two competing alliances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Red,
    Blue,
}

impl Alliance {
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Hub and scoreboard index (red 0, blue 1)
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Blue => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Alliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Field region along x
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Alliance(Alliance),
    Neutral,
}

/// Axis-aligned rectangle, origin at its minimum corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w` x `h` centered on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self {
            x: center.x - w / 2.0,
            y: center.y - h / 2.0,
            w,
            h,
        }
    }

    /// Strict overlap; touching edges do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }

}

/// Circular scoring target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hub {
    pub alliance: Alliance,
    pub center: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct Field {
    width: f32,
    length: f32,
    divider_x: f32,
    hubs: [Hub; 2],
    colliders: Vec<Rect>,
    /// y ranges of the two bump strips on each divider
    /// Bump strips straddling both dividers
    bumps: [Rect; 4],
}

impl Field {
    pub fn new(config: &FieldConfig) -> Self {
        let width = config.width;
        let length = config.length;
        let divider_x = config.divider_x;
        let center_y = length / 2.0;

        let hub_band = (center_y - HUB_SEGMENT / 2.0, center_y + HUB_SEGMENT / 2.0);
        let bump_low = (hub_band.0 - BUMP_SEGMENT, hub_band.0);
        let bump_high = (hub_band.1, hub_band.1 + BUMP_SEGMENT);
        let upright_low = bump_low.0 - UPRIGHT_SEGMENT;
        let upright_high = bump_high.1;

        let mut colliders = vec![
            Rect::new(-WALL_THICKNESS, 0.0, WALL_THICKNESS, length),
            Rect::new(width, 0.0, WALL_THICKNESS, length),
            Rect::new(0.0, -WALL_THICKNESS, width, WALL_THICKNESS),
            Rect::new(0.0, length, width, WALL_THICKNESS),
        ];
        let post_x = |x: f32| x - POST_THICKNESS / 2.0;
        for x in [divider_x, width - divider_x] {
            colliders.push(Rect::new(post_x(x), hub_band.0, POST_THICKNESS, HUB_SEGMENT));
            colliders.push(Rect::new(post_x(x), upright_low, POST_THICKNESS, UPRIGHT_SEGMENT));
            colliders.push(Rect::new(post_x(x), upright_high, POST_THICKNESS, UPRIGHT_SEGMENT));
        }

        let bump = |x: f32, (lo, hi): (f32, f32)| {
            Rect::new(x - BUMP_HALF_WIDTH, lo, BUMP_HALF_WIDTH * 2.0, hi - lo)
        };
        let bumps = [
            bump(divider_x, bump_low),
            bump(divider_x, bump_high),
            bump(width - divider_x, bump_low),
            bump(width - divider_x, bump_high),
        ];

        let hubs = [
            Hub {
                alliance: Alliance::Red,
                center: Vec2::new(divider_x, center_y),
                radius: HUB_RADIUS,
            },
            Hub {
                alliance: Alliance::Blue,
                center: Vec2::new(width - divider_x, center_y),
                radius: HUB_RADIUS,
            },
        ];

        Self {
            width,
            length,
            divider_x,
            hubs,
            colliders,
            bumps,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn divider_x(&self) -> f32 {
        self.divider_x
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.length / 2.0)
    }

    pub fn colliders(&self) -> &[Rect] {
        &self.colliders
    }

    pub fn hubs(&self) -> &[Hub; 2] {
        &self.hubs
    }

    pub fn hub(&self, alliance: Alliance) -> &Hub {
        &self.hubs[alliance.index()]
    }

    /// x of an alliance's own wall
    pub fn wall_x(&self, alliance: Alliance) -> f32 {
        match alliance {
            Alliance::Red => 0.0,
            Alliance::Blue => self.width,
        }
    }

    /// Point `offset` inches from an alliance's wall toward mid-field
    pub fn from_wall(&self, alliance: Alliance, offset: f32) -> f32 {
        match alliance {
            Alliance::Red => offset,
            Alliance::Blue => self.width - offset,
        }
    }

    /// Alliance zones include their divider line
    pub fn in_alliance_zone(&self, alliance: Alliance, x: f32) -> bool {
        match alliance {
            Alliance::Red => x <= self.divider_x,
            Alliance::Blue => x >= self.width - self.divider_x,
        }
    }

    pub fn in_neutral_zone(&self, x: f32) -> bool {
        self.divider_x < x && x < self.width - self.divider_x
    }

    pub fn zone_of(&self, x: f32) -> Zone {
        if self.in_alliance_zone(Alliance::Red, x) {
            Zone::Alliance(Alliance::Red)
        } else if self.in_alliance_zone(Alliance::Blue, x) {
            Zone::Alliance(Alliance::Blue)
        } else {
            Zone::Neutral
        }
    }

    /// Translation multiplier at `position` (slowed on the bump strips)
    pub fn speed_factor(&self, position: Vec2) -> f32 {
        if self.bumps.iter().any(|bump| bump.contains(position)) {
            BUMP_SPEED_FACTOR
        } else {
            1.0
        }
    }

    /// Bump strips as rectangles, for rendering and diagnostics
    pub fn bump_zones(&self) -> &[Rect; 4] {
        &self.bumps
    }

    /// True if `rect` overlaps a wall, post or hub structure
    pub fn hits_collider(&self, rect: &Rect) -> bool {
        self.colliders.iter().any(|c| c.intersects(rect))
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(&FieldConfig::default())
    }
}
