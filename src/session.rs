//! One round of play: countdown, the fight itself, and its outcome.
//!
//! `GameSession` owns every entity group for exactly one round.  All timing
//! goes through the `now` value (milliseconds) handed to `tick`, and all
//! randomness through the injected RNG, so a seeded RNG plus a scripted clock
//! replays a round exactly.

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Alien, AlienBullet, Bullet, Entity, Explosion, ExplosionSize, InputState, Lifecycle, Sfx,
    Spaceship,
};
use crate::group::Group;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Countdown,
    Active,
    Won,
    Lost,
}

impl Phase {
    pub fn is_over(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

const GRID_LEFT: i32 = 100;
const GRID_TOP: i32 = 100;
const GRID_DX: i32 = 100;
const GRID_DY: i32 = 70;
/// Ship centre sits this far above the bottom of the field.
const SHIP_LIFT: i32 = 100;

const COUNTDOWN_STEP_MS: u64 = 1000;

#[derive(Clone, Debug)]
pub struct GameSession {
    pub config: GameConfig,
    pub phase: Phase,
    /// Seconds left before the round starts.
    pub countdown: u32,
    pub last_count: u64,
    pub last_alien_shot: u64,
    pub spaceship: Group<Spaceship>,
    pub bullets: Group<Bullet>,
    pub aliens: Group<Alien>,
    pub alien_bullets: Group<AlienBullet>,
    pub explosions: Group<Explosion>,
    sounds: Vec<Sfx>,
}

impl GameSession {
    /// Fresh round started at `now`: full alien grid, new ship, countdown.
    pub fn new(config: GameConfig, now: u64, rng: &mut impl Rng) -> Self {
        let mut session = GameSession {
            phase: if config.countdown_secs == 0 {
                Phase::Active
            } else {
                Phase::Countdown
            },
            countdown: config.countdown_secs,
            last_count: now,
            last_alien_shot: now,
            spaceship: Group::new(),
            bullets: Group::new(),
            aliens: Group::new(),
            alien_bullets: Group::new(),
            explosions: Group::new(),
            sounds: Vec::new(),
            config,
        };
        session.spawn_aliens(rng);
        session.spaceship.add(Spaceship::new(
            session.config.field_width / 2,
            session.config.field_height - SHIP_LIFT,
            session.config.ship_health,
        ));
        info!(
            "new session: {} aliens, ship health {}",
            session.aliens.len(),
            session.config.ship_health
        );
        session
    }

    fn spawn_aliens(&mut self, rng: &mut impl Rng) {
        for row in 0..self.config.alien_rows as i32 {
            for col in 0..self.config.alien_cols as i32 {
                let variant = rng.gen_range(1..=5);
                self.aliens.add(Alien::new(
                    GRID_LEFT + col * GRID_DX,
                    GRID_TOP + row * GRID_DY,
                    self.config.alien_patrol,
                    variant,
                ));
            }
        }
    }

    pub fn ship(&self) -> Option<&Spaceship> {
        self.spaceship.iter().next()
    }

    pub fn ship_mut(&mut self) -> Option<&mut Spaceship> {
        self.spaceship.iter_mut().next()
    }

    /// Sound effects queued since the last call.
    pub fn take_sounds(&mut self) -> Vec<Sfx> {
        std::mem::take(&mut self.sounds)
    }

    // ── Per-tick ──────────────────────────────────────────────────────────────

    /// Advance one tick.  `now` is the clock sampled once for this tick.
    pub fn tick(&mut self, input: &InputState, now: u64, rng: &mut impl Rng) {
        match self.phase {
            Phase::Countdown => self.tick_countdown(now),
            Phase::Active => self.tick_active(input, now, rng),
            Phase::Won | Phase::Lost => self.explosions.update(Explosion::update),
        }
    }

    fn tick_countdown(&mut self, now: u64) {
        if now.saturating_sub(self.last_count) < COUNTDOWN_STEP_MS {
            return;
        }
        self.countdown = self.countdown.saturating_sub(1);
        self.last_count = now;
        debug!("countdown {}", self.countdown);
        if self.countdown == 0 {
            self.phase = Phase::Active;
            info!("session active");
        }
    }

    fn tick_active(&mut self, input: &InputState, now: u64, rng: &mut impl Rng) {
        // ── 1. Alien fire ─────────────────────────────────────────────────────
        if now.saturating_sub(self.last_alien_shot) > self.config.alien_fire_cooldown_ms
            && self.alien_bullets.len() < self.config.max_alien_bullets
            && !self.aliens.is_empty()
        {
            let pick = rng.gen_range(0..self.aliens.len());
            if let Some(shooter) = self.aliens.get(pick) {
                let b = shooter.bounds();
                self.alien_bullets.add(AlienBullet::new(
                    b.x + b.w / 2,
                    b.bottom(),
                    self.config.alien_bullet_speed,
                ));
                self.last_alien_shot = now;
            }
        }

        // ── 2. Entities ───────────────────────────────────────────────────────
        let config = &self.config;
        for ship in self.spaceship.iter_mut() {
            ship.update(input, now, config, &mut self.bullets, &mut self.sounds);
        }
        self.bullets
            .update(|b| b.update(&mut self.aliens, &mut self.explosions, &mut self.sounds));
        self.aliens.update(Alien::update);
        let field_height = self.config.field_height;
        self.alien_bullets.update(|b| {
            b.update(
                field_height,
                &mut self.spaceship,
                &mut self.explosions,
                &mut self.sounds,
            )
        });
        self.explosions.update(Explosion::update);

        // ── 3. Outcome: win first, then health ────────────────────────────────
        if self.aliens.is_empty() {
            self.phase = Phase::Won;
            info!("session won");
            return;
        }

        let wreck = self
            .spaceship
            .iter()
            .find(|s| s.is_destroyed())
            .map(|s| s.bounds().center());
        if let Some(center) = wreck {
            self.explosions.add(Explosion::new(center, ExplosionSize::Large));
            self.sounds.push(Sfx::ShipHit);
            self.spaceship.update(|s| {
                if s.is_destroyed() {
                    Lifecycle::Expired
                } else {
                    Lifecycle::Alive
                }
            });
            self.phase = Phase::Lost;
            info!("session lost");
        }
    }
}
