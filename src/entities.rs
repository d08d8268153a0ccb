//! Game entities: the spaceship, both kinds of bullet, aliens and explosions.
//!
//! Every entity is plain data plus its own per-tick `update`.  Entities never
//! own each other; anything an update needs to touch (the alien group for a
//! player bullet, the explosion group for a hit) is passed in by the session.

use lazy_static::lazy_static;

use crate::collision::{masks_overlap, Rect, Sprite};
use crate::config::GameConfig;
use crate::group::Group;

// ── Pixel art ─────────────────────────────────────────────────────────────────

const SHIP_ART: &[&str] = &[
    "......#......",
    ".....###.....",
    ".....###.....",
    ".###########.",
    "#############",
    "#############",
    "#############",
    "#############",
];

const ALIEN_ART: &[&str] = &[
    "..#.....#..",
    "...#...#...",
    "..#######..",
    ".##.###.##.",
    "###########",
    "#.#######.#",
    "#.#.....#.#",
    "...##.##...",
];

const ALIEN_BULLET_ART: &[&str] = &[
    ".#.",
    "###",
    ".#.",
    "###",
    ".#.",
];

const EXPLOSION_ART: [&[&str]; 5] = [
    &[".....", ".....", "..#..", ".....", "....."],
    &[".....", "..#..", ".###.", "..#..", "....."],
    &["..#..", ".###.", "#####", ".###.", "..#.."],
    &["#.#.#", ".#.#.", "#.#.#", ".#.#.", "#.#.#"],
    &["#...#", ".....", "..#..", ".....", "#...#"],
];

fn explosion_frames(scale: i32) -> Vec<Sprite> {
    EXPLOSION_ART
        .iter()
        .map(|art| Sprite::from_art(art, scale))
        .collect()
}

lazy_static! {
    static ref SHIP_SPRITE: Sprite = Sprite::from_art(SHIP_ART, 4);
    static ref ALIEN_SPRITE: Sprite = Sprite::from_art(ALIEN_ART, 4);
    static ref BULLET_SPRITE: Sprite = Sprite::solid(4, 12);
    static ref ALIEN_BULLET_SPRITE: Sprite = Sprite::from_art(ALIEN_BULLET_ART, 2);
    static ref EXPLOSION_SMALL: Vec<Sprite> = explosion_frames(4);
    static ref EXPLOSION_MEDIUM: Vec<Sprite> = explosion_frames(8);
    static ref EXPLOSION_LARGE: Vec<Sprite> = explosion_frames(32);
}

// ── Shared capability ─────────────────────────────────────────────────────────

/// What the renderer needs to pick glyphs and colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visual {
    Spaceship,
    Bullet,
    AlienBullet,
    Alien { variant: u8 },
    Explosion { size: ExplosionSize, frame: usize },
}

/// Returned by per-tick updates; `Expired` members are dropped by their group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Expired,
}

pub trait Entity {
    /// Top-left corner in field pixels.
    fn position(&self) -> (i32, i32);
    fn sprite(&self) -> &'static Sprite;
    fn visual(&self) -> Visual;

    fn bounds(&self) -> Rect {
        let (x, y) = self.position();
        self.sprite().rect_at(x, y)
    }
}

/// Sound effects the frontend may play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sfx {
    Laser,
    AlienDestroyed,
    ShipHit,
}

impl Sfx {
    pub fn volume(&self) -> f32 {
        match self {
            Sfx::Laser => 0.25,
            Sfx::AlienDestroyed => 0.25,
            Sfx::ShipHit => 0.25,
        }
    }
}

/// Continuous (held) input sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Spaceship ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Spaceship {
    pub x: i32,
    pub y: i32,
    pub health_start: u32,
    pub health_remaining: u32,
    /// Tick timestamp (ms) of the last shot, `None` before the first one.
    pub last_shot: Option<u64>,
}

pub const HEALTH_BAR_GAP: i32 = 10;
pub const HEALTH_BAR_HEIGHT: i32 = 15;

impl Spaceship {
    pub fn new(center_x: i32, center_y: i32, health: u32) -> Self {
        Spaceship {
            x: center_x - SHIP_SPRITE.width() / 2,
            y: center_y - SHIP_SPRITE.height() / 2,
            health_start: health,
            health_remaining: health,
            last_shot: None,
        }
    }

    pub fn width(&self) -> i32 {
        SHIP_SPRITE.width()
    }

    pub fn can_fire(&self, now: u64, cooldown_ms: u64) -> bool {
        match self.last_shot {
            None => true,
            Some(last) => now.saturating_sub(last) >= cooldown_ms,
        }
    }

    /// Move, clamp to the field and fire if the cooldown allows it.
    pub fn update(
        &mut self,
        input: &InputState,
        now: u64,
        config: &GameConfig,
        bullets: &mut Group<Bullet>,
        sounds: &mut Vec<Sfx>,
    ) {
        if input.left {
            self.x -= config.ship_speed;
        }
        if input.right {
            self.x += config.ship_speed;
        }
        self.x = self.x.clamp(0, (config.field_width - self.width()).max(0));

        if input.fire && self.can_fire(now, config.ship_fire_cooldown_ms) {
            let b = self.bounds();
            bullets.add(Bullet::new(b.x + b.w / 2, b.y, config.bullet_speed));
            sounds.push(Sfx::Laser);
            self.last_shot = Some(now);
        }
    }

    pub fn take_hit(&mut self) {
        self.health_remaining = self.health_remaining.saturating_sub(1);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health_remaining == 0
    }

    /// Background and foreground segments of the health bar.
    pub fn health_bar(&self) -> (Rect, Rect) {
        let b = self.bounds();
        let y = b.bottom() + HEALTH_BAR_GAP;
        let background = Rect::new(b.x, y, b.w, HEALTH_BAR_HEIGHT);
        let filled = if self.health_start == 0 {
            0
        } else {
            (b.w as i64 * self.health_remaining as i64 / self.health_start as i64) as i32
        };
        (background, Rect::new(b.x, y, filled, HEALTH_BAR_HEIGHT))
    }
}

impl Entity for Spaceship {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    // Collision tests read the mask of the current image every time.
    fn sprite(&self) -> &'static Sprite {
        &SHIP_SPRITE
    }

    fn visual(&self) -> Visual {
        Visual::Spaceship
    }
}

// ── Player bullet ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
    /// Pixels per tick; negative is up.
    pub speed: i32,
}

impl Bullet {
    /// Bullet centred on `(center_x, center_y)`.
    pub fn new(center_x: i32, center_y: i32, speed: i32) -> Self {
        Bullet {
            x: center_x - BULLET_SPRITE.width() / 2,
            y: center_y - BULLET_SPRITE.height() / 2,
            speed,
        }
    }

    /// Move, leave the field or hit the first overlapping alien.
    pub fn update(
        &mut self,
        aliens: &mut Group<Alien>,
        explosions: &mut Group<Explosion>,
        sounds: &mut Vec<Sfx>,
    ) -> Lifecycle {
        self.y += self.speed;
        let bounds = self.bounds();
        if bounds.bottom() < 0 {
            return Lifecycle::Expired;
        }
        if aliens.remove_first_colliding(&bounds).is_some() {
            explosions.add(Explosion::new(bounds.center(), ExplosionSize::Small));
            sounds.push(Sfx::AlienDestroyed);
            return Lifecycle::Expired;
        }
        Lifecycle::Alive
    }
}

impl Entity for Bullet {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn sprite(&self) -> &'static Sprite {
        &BULLET_SPRITE
    }

    fn visual(&self) -> Visual {
        Visual::Bullet
    }
}

// ── Alien bullet ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AlienBullet {
    pub x: i32,
    pub y: i32,
    pub speed: i32,
}

impl AlienBullet {
    /// Bullet centred on `(center_x, center_y)`.
    pub fn new(center_x: i32, center_y: i32, speed: i32) -> Self {
        AlienBullet {
            x: center_x - ALIEN_BULLET_SPRITE.width() / 2,
            y: center_y - ALIEN_BULLET_SPRITE.height() / 2,
            speed,
        }
    }

    /// Move, leave the field or hit the spaceship.  Hits are mask-precise.
    pub fn update(
        &mut self,
        field_height: i32,
        ships: &mut Group<Spaceship>,
        explosions: &mut Group<Explosion>,
        sounds: &mut Vec<Sfx>,
    ) -> Lifecycle {
        self.y += self.speed;
        if self.y > field_height {
            return Lifecycle::Expired;
        }
        if let Some(ship) = ships.first_mask_colliding_mut(self) {
            ship.take_hit();
            explosions.add(Explosion::new(self.bounds().center(), ExplosionSize::Small));
            sounds.push(Sfx::ShipHit);
            return Lifecycle::Expired;
        }
        Lifecycle::Alive
    }
}

impl Entity for AlienBullet {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn sprite(&self) -> &'static Sprite {
        &ALIEN_BULLET_SPRITE
    }

    fn visual(&self) -> Visual {
        Visual::AlienBullet
    }
}

// ── Alien ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Alien {
    pub x: i32,
    pub y: i32,
    /// -1 or +1.
    pub move_direction: i32,
    /// Net horizontal displacement since the last flip point.
    pub move_counter: i32,
    pub patrol: i32,
    /// Cosmetic only, 1..=5.
    pub variant: u8,
}

impl Alien {
    pub fn new(center_x: i32, center_y: i32, patrol: i32, variant: u8) -> Self {
        Alien {
            x: center_x - ALIEN_SPRITE.width() / 2,
            y: center_y - ALIEN_SPRITE.height() / 2,
            move_direction: 1,
            move_counter: 0,
            patrol,
            variant,
        }
    }

    pub fn update(&mut self) -> Lifecycle {
        self.x += self.move_direction;
        self.move_counter += self.move_direction;
        if self.move_counter.abs() > self.patrol {
            self.move_direction = -self.move_direction;
        }
        Lifecycle::Alive
    }
}

impl Entity for Alien {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn sprite(&self) -> &'static Sprite {
        &ALIEN_SPRITE
    }

    fn visual(&self) -> Visual {
        Visual::Alien {
            variant: self.variant,
        }
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionSize {
    /// 20 px frames.
    Small,
    /// 40 px frames.
    Medium,
    /// 160 px frames.
    Large,
}

impl ExplosionSize {
    pub fn frames(&self) -> &'static [Sprite] {
        match self {
            ExplosionSize::Small => &EXPLOSION_SMALL,
            ExplosionSize::Medium => &EXPLOSION_MEDIUM,
            ExplosionSize::Large => &EXPLOSION_LARGE,
        }
    }
}

/// Ticks each frame is held.
pub const EXPLOSION_FRAME_TICKS: u32 = 3;

#[derive(Clone, Debug)]
pub struct Explosion {
    pub center_x: i32,
    pub center_y: i32,
    pub size: ExplosionSize,
    pub index: usize,
    pub counter: u32,
}

impl Explosion {
    pub fn new(center: (i32, i32), size: ExplosionSize) -> Self {
        Explosion {
            center_x: center.0,
            center_y: center.1,
            size,
            index: 0,
            counter: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.size.frames().len()
    }

    pub fn update(&mut self) -> Lifecycle {
        self.counter += 1;
        let last = self.frame_count().saturating_sub(1);
        if self.counter >= EXPLOSION_FRAME_TICKS {
            if self.index < last {
                self.index += 1;
                self.counter = 0;
            } else {
                return Lifecycle::Expired;
            }
        }
        Lifecycle::Alive
    }
}

impl Entity for Explosion {
    fn position(&self) -> (i32, i32) {
        let s = self.sprite();
        (self.center_x - s.width() / 2, self.center_y - s.height() / 2)
    }

    fn sprite(&self) -> &'static Sprite {
        &self.size.frames()[self.index]
    }

    fn visual(&self) -> Visual {
        Visual::Explosion {
            size: self.size,
            frame: self.index,
        }
    }
}

/// Mask overlap between two entities at their current positions.
pub fn entities_overlap(a: &impl Entity, b: &impl Entity) -> bool {
    masks_overlap(a.sprite(), a.position(), b.sprite(), b.position())
}
