use space_raiders::config::GameConfig;
use space_raiders::entities::*;
use space_raiders::session::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A session already past its countdown, started at t=0.
fn active_session(rng: &mut StdRng) -> GameSession {
    let config = GameConfig {
        countdown_secs: 0,
        ..GameConfig::default()
    };
    GameSession::new(config, 0, rng)
}

const IDLE: InputState = InputState {
    left: false,
    right: false,
    fire: false,
};

/// Put a player bullet just under `alien_index` so the next tick hits it.
fn aim_at(session: &mut GameSession, alien_index: usize) {
    let b = session.aliens.get(alien_index).unwrap().bounds();
    let (cx, _) = b.center();
    session.bullets.add(Bullet::new(cx, b.bottom() + 6, -7));
}

/// Put an alien bullet on the ship's centre line so the next tick hits it.
fn shoot_ship(session: &mut GameSession) {
    let (cx, cy) = session.ship().unwrap().bounds().center();
    session.alien_bullets.add(AlienBullet::new(cx, cy, 4));
}

// ── new ───────────────────────────────────────────────────────────────────────

#[test]
fn new_session_layout() {
    let s = GameSession::new(GameConfig::default(), 0, &mut seeded_rng());
    assert_eq!(s.phase, Phase::Countdown);
    assert_eq!(s.countdown, 3);
    assert_eq!(s.aliens.len(), 25);
    assert_eq!(s.spaceship.len(), 1);
    assert!(s.bullets.is_empty());
    assert!(s.alien_bullets.is_empty());
    assert!(s.explosions.is_empty());

    let ship = s.ship().unwrap();
    assert_eq!(ship.health_remaining, 3);
    assert_eq!(ship.bounds().center(), (400, 500));

    // 5×5 grid centred at 100 + 100·col, 100 + 70·row.
    let first = s.aliens.get(0).unwrap().bounds().center();
    let last = s.aliens.get(24).unwrap().bounds().center();
    assert_eq!(first, (100, 100));
    assert_eq!(last, (500, 380));
    assert!(s
        .aliens
        .iter()
        .all(|a| (1..=5).contains(&a.variant)));
}

#[test]
fn same_seed_same_aliens() {
    let a = GameSession::new(GameConfig::default(), 0, &mut seeded_rng());
    let b = GameSession::new(GameConfig::default(), 0, &mut seeded_rng());
    let va: Vec<u8> = a.aliens.iter().map(|x| x.variant).collect();
    let vb: Vec<u8> = b.aliens.iter().map(|x| x.variant).collect();
    assert_eq!(va, vb);
}

// ── Countdown ─────────────────────────────────────────────────────────────────

#[test]
fn countdown_ticks_once_per_second() {
    let mut rng = seeded_rng();
    let mut s = GameSession::new(GameConfig::default(), 0, &mut rng);

    s.tick(&IDLE, 999, &mut rng);
    assert_eq!(s.countdown, 3);
    s.tick(&IDLE, 1_000, &mut rng);
    assert_eq!(s.countdown, 2);
    s.tick(&IDLE, 1_500, &mut rng);
    assert_eq!(s.countdown, 2);
    s.tick(&IDLE, 2_000, &mut rng);
    assert_eq!(s.countdown, 1);
    assert_eq!(s.phase, Phase::Countdown);
    s.tick(&IDLE, 3_000, &mut rng);
    assert_eq!(s.countdown, 0);
    assert_eq!(s.phase, Phase::Active);
}

#[test]
fn nothing_moves_during_countdown() {
    let mut rng = seeded_rng();
    let mut s = GameSession::new(GameConfig::default(), 0, &mut rng);
    let alien_x = s.aliens.get(0).unwrap().x;
    let ship_x = s.ship().unwrap().x;
    let input = InputState {
        left: true,
        right: false,
        fire: true,
    };
    for t in 0..100u64 {
        s.tick(&input, t * 16, &mut rng);
    }
    assert_eq!(s.phase, Phase::Countdown);
    assert_eq!(s.aliens.get(0).unwrap().x, alien_x);
    assert_eq!(s.ship().unwrap().x, ship_x);
    assert!(s.bullets.is_empty());
    assert!(s.alien_bullets.is_empty());
}

#[test]
fn zero_countdown_starts_active() {
    let s = active_session(&mut seeded_rng());
    assert_eq!(s.phase, Phase::Active);
}

// ── Alien fire ────────────────────────────────────────────────────────────────

#[test]
fn aliens_hold_fire_for_a_second() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    s.tick(&IDLE, 500, &mut rng);
    s.tick(&IDLE, 1_000, &mut rng);
    assert!(s.alien_bullets.is_empty());

    s.tick(&IDLE, 1_001, &mut rng);
    assert_eq!(s.alien_bullets.len(), 1);
    assert_eq!(s.last_alien_shot, 1_001);

    s.tick(&IDLE, 1_500, &mut rng);
    assert_eq!(s.alien_bullets.len(), 1);
}

#[test]
fn alien_bullet_leaves_an_aliens_bottom_edge() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    s.tick(&IDLE, 1_001, &mut rng);

    let shot = s.alien_bullets.get(0).unwrap().bounds();
    let (shot_x, _) = shot.center();
    let spawn_y = shot.center().1 - 4; // one tick of travel
    assert!(s.aliens.iter().any(|a| {
        let b = a.bounds();
        (b.center().0 - shot_x).abs() <= 1 && b.bottom() == spawn_y
    }));
}

#[test]
fn alien_fire_capped_at_five() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    for i in 0..5 {
        s.alien_bullets.add(AlienBullet::new(20 + i * 10, 20, 4));
    }
    s.tick(&IDLE, 5_000, &mut rng);
    assert_eq!(s.alien_bullets.len(), 5);
    assert_eq!(s.last_alien_shot, 0);
}

#[test]
fn alien_fire_over_time_stays_within_cap() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    for t in 0..600u64 {
        s.tick(&IDLE, t * 50, &mut rng);
        assert!(s.alien_bullets.len() <= 5);
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

#[test]
fn ship_shot_destroys_bottom_alien_above_it() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    let fire = InputState {
        fire: true,
        ..IDLE
    };
    // Ship centre x=400 sits under column 3; the bottom row is at y=380.
    let bottom_row = |s: &GameSession| {
        s.aliens
            .iter()
            .filter(|a| a.bounds().center().1 == 380)
            .count()
    };
    assert_eq!(bottom_row(&s), 5);

    s.tick(&fire, 16, &mut rng);
    assert_eq!(s.bullets.len(), 1);
    for t in 2..40u64 {
        s.tick(&IDLE, t * 16, &mut rng);
    }
    assert_eq!(s.aliens.len(), 24);
    assert_eq!(bottom_row(&s), 4);
    assert!(s.bullets.is_empty());
}

#[test]
fn clearing_all_aliens_wins() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    let mut now = 0;
    for remaining in (0..25).rev() {
        assert_eq!(s.phase, Phase::Active);
        aim_at(&mut s, 0);
        now += 16;
        s.tick(&IDLE, now, &mut rng);
        assert_eq!(s.aliens.len(), remaining);
    }
    assert_eq!(s.phase, Phase::Won);
    assert!(s.aliens.is_empty());
    assert_eq!(s.spaceship.len(), 1);
}

#[test]
fn three_hits_lose_and_remove_ship() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    let mut now = 0;
    for health in (0..3).rev() {
        shoot_ship(&mut s);
        now += 16;
        s.tick(&IDLE, now, &mut rng);
        if health > 0 {
            assert_eq!(s.ship().unwrap().health_remaining, health);
            assert_eq!(s.phase, Phase::Active);
        }
    }
    assert_eq!(s.phase, Phase::Lost);
    assert!(s.spaceship.is_empty());
    assert!(s
        .explosions
        .iter()
        .any(|e| e.size == ExplosionSize::Large && e.bounds().center() == (400, 500)));
}

#[test]
fn win_checked_before_health() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    while s.aliens.len() > 1 {
        let first = s.aliens.get(0).unwrap().bounds();
        s.aliens.remove_first_colliding(&first);
    }
    s.ship_mut().unwrap().health_remaining = 1;
    aim_at(&mut s, 0);
    shoot_ship(&mut s);
    s.tick(&IDLE, 16, &mut rng);

    assert_eq!(s.phase, Phase::Won);
    assert_eq!(s.spaceship.len(), 1);
    assert_eq!(s.ship().unwrap().health_remaining, 0);
}

#[test]
fn finished_session_only_animates_explosions() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    s.ship_mut().unwrap().health_remaining = 1;
    shoot_ship(&mut s);
    s.tick(&IDLE, 16, &mut rng);
    assert_eq!(s.phase, Phase::Lost);

    let alien_x: Vec<i32> = s.aliens.iter().map(|a| a.x).collect();
    let alien_shots = s.alien_bullets.len();
    for t in 2..40u64 {
        s.tick(&IDLE, 5_000 + t * 16, &mut rng);
    }
    let after: Vec<i32> = s.aliens.iter().map(|a| a.x).collect();
    assert_eq!(alien_x, after);
    assert_eq!(s.alien_bullets.len(), alien_shots);
    assert!(s.explosions.is_empty());
    assert_eq!(s.phase, Phase::Lost);
}

// ── Sounds ────────────────────────────────────────────────────────────────────

#[test]
fn sounds_are_drained() {
    let mut rng = seeded_rng();
    let mut s = active_session(&mut rng);
    let fire = InputState {
        fire: true,
        ..IDLE
    };
    s.tick(&fire, 16, &mut rng);
    assert_eq!(s.take_sounds(), vec![Sfx::Laser]);
    assert!(s.take_sounds().is_empty());
}
