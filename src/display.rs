//! Rendering layer — all terminal output lives here.
//!
//! The simulation runs on an 800×600 pixel field; this module scales that
//! field onto whatever terminal size is available and rasterises every
//! sprite mask into character cells.  No game logic is performed.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_raiders::collision::{Rect, Sprite};
use space_raiders::entities::{Entity, ExplosionSize, Visual};
use space_raiders::game::{Game, Screen};
use space_raiders::group::Group;
use space_raiders::session::{GameSession, Phase};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ALIEN: Color = Color::Magenta;
const C_HEALTH_BG: Color = Color::Red;
const C_HEALTH_FG: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::White;
const C_BODY: Color = Color::Grey;

fn alien_color(variant: u8) -> Color {
    match variant {
        1 => Color::Green,
        2 => Color::Cyan,
        3 => Color::Magenta,
        4 => Color::Yellow,
        _ => Color::Red,
    }
}

fn explosion_color(size: ExplosionSize, frame: usize) -> Color {
    match (size, frame) {
        (_, 0 | 1) => Color::White,
        (_, 2) => Color::Yellow,
        (ExplosionSize::Large, _) => Color::Red,
        _ => Color::DarkYellow,
    }
}

fn glyph_for(visual: Visual) -> (&'static str, Color) {
    match visual {
        Visual::Spaceship => ("█", C_PLAYER),
        Visual::Bullet => ("║", C_BULLET_PLAYER),
        Visual::AlienBullet => ("↓", C_BULLET_ALIEN),
        Visual::Alien { variant } => ("▓", alien_color(variant)),
        Visual::Explosion { size, frame } => ("*", explosion_color(size, frame)),
    }
}

// ── Field → terminal mapping ──────────────────────────────────────────────────

/// Play-field area of the terminal, inside the border.
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    field_w: i32,
    field_h: i32,
}

impl Viewport {
    fn new(width: u16, height: u16, field_w: i32, field_h: i32) -> Self {
        Viewport {
            left: 1,
            top: 2,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
            field_w: field_w.max(1),
            field_h: field_h.max(1),
        }
    }

    fn col_of(&self, x: i32) -> i32 {
        (x as i64 * self.cols as i64).div_euclid(self.field_w as i64) as i32
    }

    fn row_of(&self, y: i32) -> i32 {
        (y as i64 * self.rows as i64).div_euclid(self.field_h as i64) as i32
    }

    /// Field-pixel box covered by one cell.
    fn cell_rect(&self, col: i32, row: i32) -> Rect {
        let x0 = (col as i64 * self.field_w as i64 / self.cols as i64) as i32;
        let x1 = ((col + 1) as i64 * self.field_w as i64 / self.cols as i64) as i32;
        let y0 = (row as i64 * self.field_h as i64 / self.rows as i64) as i32;
        let y1 = ((row + 1) as i64 * self.field_h as i64 / self.rows as i64) as i32;
        Rect::new(x0, y0, (x1 - x0).max(1), (y1 - y0).max(1))
    }

    /// Cells touched by `area`, clipped to the viewport.
    fn cells(&self, area: &Rect) -> impl Iterator<Item = (i32, i32)> {
        let c0 = self.col_of(area.x).max(0);
        let c1 = self.col_of(area.right() - 1).min(self.cols as i32 - 1);
        let r0 = self.row_of(area.y).max(0);
        let r1 = self.row_of(area.bottom() - 1).min(self.rows as i32 - 1);
        (r0..=r1).flat_map(move |r| (c0..=c1).map(move |c| (c, r)))
    }

    fn move_to(&self, col: i32, row: i32) -> cursor::MoveTo {
        cursor::MoveTo(self.left + col as u16, self.top + row as u16)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match &game.screen {
        Screen::Menu => draw_menu(out, width, height)?,
        Screen::Playing(session) => {
            let vp = Viewport::new(
                width,
                height,
                session.config.field_width,
                session.config.field_height,
            );
            draw_border(out, width, height)?;
            draw_hud(out, session)?;
            draw_session(out, &vp, session)?;
            draw_controls_hint(out, height)?;
            match session.phase {
                Phase::Countdown => draw_countdown(out, width, height, session.countdown)?,
                Phase::Won => draw_banner(out, width, height, "YOU WIN!", Color::Green)?,
                Phase::Lost => draw_banner(out, width, height, "GAME OVER!", Color::Red)?,
                Phase::Active => {}
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let top = (height / 2).saturating_sub(6);
    draw_centered(out, width, top, "★  SPACE  RAIDERS  ★", C_TITLE)?;

    let lines = [
        "How to Play:",
        "Move: Left/Right Arrow OR A/D",
        "Shoot: Space",
        "Destroy every alien before they wear down your hull.",
        "",
        "Press ENTER to Start",
        "Press ESC to Quit",
    ];
    for (i, line) in lines.iter().enumerate() {
        let color = if i == 0 { C_TITLE } else { C_BODY };
        draw_centered(out, width, top + 2 + i as u16, line, color)?;
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &GameSession) -> std::io::Result<()> {
    let health = session.ship().map(|s| s.health_remaining).unwrap_or(0);
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Health: {}   Aliens: {:>2}",
        health,
        session.aliens.len()
    )))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_sprite<W: Write>(
    out: &mut W,
    vp: &Viewport,
    pos: (i32, i32),
    sprite: &Sprite,
    visual: Visual,
) -> std::io::Result<()> {
    let (glyph, color) = glyph_for(visual);
    out.queue(style::SetForegroundColor(color))?;
    for (col, row) in vp.cells(&sprite.rect_at(pos.0, pos.1)) {
        if sprite.any_opaque_in(pos.0, pos.1, &vp.cell_rect(col, row)) {
            out.queue(vp.move_to(col, row))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

fn draw_group<W: Write, T: Entity>(
    out: &mut W,
    vp: &Viewport,
    group: &Group<T>,
) -> std::io::Result<()> {
    for (pos, sprite, visual) in group.visuals() {
        draw_sprite(out, vp, pos, sprite, visual)?;
    }
    Ok(())
}

fn draw_rect<W: Write>(
    out: &mut W,
    vp: &Viewport,
    area: &Rect,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if area.w <= 0 || area.h <= 0 {
        return Ok(());
    }
    out.queue(style::SetForegroundColor(color))?;
    for (col, row) in vp.cells(area) {
        out.queue(vp.move_to(col, row))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_session<W: Write>(
    out: &mut W,
    vp: &Viewport,
    session: &GameSession,
) -> std::io::Result<()> {
    draw_group(out, vp, &session.aliens)?;
    draw_group(out, vp, &session.bullets)?;
    draw_group(out, vp, &session.alien_bullets)?;
    draw_group(out, vp, &session.spaceship)?;

    if let Some(ship) = session.ship() {
        let (background, filled) = ship.health_bar();
        draw_rect(out, vp, &background, "░", C_HEALTH_BG)?;
        draw_rect(out, vp, &filled, "█", C_HEALTH_FG)?;
    }

    draw_group(out, vp, &session.explosions)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   ESC : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_countdown<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    remaining: u32,
) -> std::io::Result<()> {
    let cy = height / 2;
    draw_centered(out, width, cy.saturating_sub(1), "GET READY!", Color::Yellow)?;
    draw_centered(out, width, cy + 1, &remaining.to_string(), Color::Yellow)?;
    Ok(())
}

fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    title: &str,
    color: Color,
) -> std::io::Result<()> {
    let inner = format!("  {:^16}  ", title);
    let bar = "═".repeat(inner.chars().count());
    let cy = (height / 2).saturating_sub(2);

    draw_centered(out, width, cy, &format!("╔{}╗", bar), color)?;
    draw_centered(out, width, cy + 1, &format!("║{}║", inner), color)?;
    draw_centered(out, width, cy + 2, &format!("╚{}╝", bar), color)?;
    draw_centered(out, width, cy + 3, "ENTER - Menu   ESC - Quit", Color::White)?;
    Ok(())
}
