//! Gameplay constants and run settings.
//!
//! `GameConfig` holds everything the simulation needs (field size, speeds,
//! cooldowns).  `RunConfig` holds what only the frontend cares about
//! (frame rate, seed, sound).  Both validate before use.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("frame rate must be between 1 and {max}, got {got}")]
    FrameRate { got: u32, max: u32 },
    #[error("starting health must be at least 1")]
    ZeroHealth,
    #[error("volume must be within 0.0..=1.0, got {0}")]
    Volume(f32),
}

pub const MAX_FPS: u32 = 240;

// ── Simulation ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub field_width: i32,
    pub field_height: i32,
    /// Pixels per tick, horizontal.
    pub ship_speed: i32,
    pub ship_health: u32,
    pub ship_fire_cooldown_ms: u64,
    /// Negative: player bullets travel up.
    pub bullet_speed: i32,
    pub alien_bullet_speed: i32,
    pub alien_fire_cooldown_ms: u64,
    pub max_alien_bullets: usize,
    pub alien_rows: usize,
    pub alien_cols: usize,
    /// Patrol limit; the direction flips once |move_counter| exceeds it.
    pub alien_patrol: i32,
    pub countdown_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            field_width: 800,
            field_height: 600,
            ship_speed: 8,
            ship_health: 3,
            ship_fire_cooldown_ms: 500,
            bullet_speed: -7,
            alien_bullet_speed: 4,
            alien_fire_cooldown_ms: 1000,
            max_alien_bullets: 5,
            alien_rows: 5,
            alien_cols: 5,
            alien_patrol: 75,
            countdown_secs: 3,
        }
    }
}

impl GameConfig {
    pub fn with_health(self, ship_health: u32) -> Result<Self, ConfigError> {
        if ship_health == 0 {
            return Err(ConfigError::ZeroHealth);
        }
        Ok(GameConfig { ship_health, ..self })
    }
}

// ── Frontend ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub fps: u32,
    pub seed: Option<u64>,
    /// Master volume, 0.0 silences every effect.
    pub volume: f32,
    pub mute: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            fps: 60,
            seed: None,
            volume: 1.0,
            mute: false,
        }
    }
}

impl RunConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::FrameRate {
                got: self.fps,
                max: MAX_FPS,
            });
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::Volume(self.volume));
        }
        Ok(self)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}
