//! Terminal rendering
//!
//! Pure output: every function here is a function of the current state and
//! queues crossterm commands, it never mutates game data. The 800x600
//! logical play area is scaled onto the terminal grid at draw time; the
//! simulation itself always runs in logical units.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use coinfall::consts::*;
use coinfall::settings::Settings;
use coinfall::sim::{GameState, Phase, ShopOutcome};

/// Which page of the main menu is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPage {
    #[default]
    Main,
    Instructions,
}

/// Frontend-only presentation state (never touches the simulation)
#[derive(Debug, Default)]
pub struct UiState {
    pub menu_page: MenuPage,
    /// Outcome of the most recent purchase attempt, shown in the shop
    pub shop_message: Option<ShopOutcome>,
    /// Measured frames per second, if the counter is enabled
    pub fps: Option<u32>,
}

/// Mapping from logical play-area coordinates to terminal cells. Row 0 is
/// reserved for the HUD.
struct Viewport {
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn current() -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            cols: cols.max(20),
            rows: rows.max(10),
        })
    }

    /// Project a logical position to a cell, or None when off screen
    fn project(&self, pos: Vec2) -> Option<(u16, u16)> {
        if pos.x < 0.0 || pos.x >= CANVAS_WIDTH || pos.y < 0.0 || pos.y >= CANVAS_HEIGHT {
            return None;
        }
        let col = (pos.x / CANVAS_WIDTH * self.cols as f32) as u16;
        let row = 1 + (pos.y / CANVAS_HEIGHT * (self.rows - 1) as f32) as u16;
        Some((col.min(self.cols - 1), row.min(self.rows - 1)))
    }
}

fn tint(settings: &Settings, color: Color) -> Color {
    if settings.color { color } else { Color::White }
}

fn rgb(settings: &Settings, [r, g, b]: [u8; 3]) -> Color {
    tint(settings, Color::Rgb { r, g, b })
}

fn print_centered<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    row: u16,
    color: Color,
    text: &str,
) -> std::io::Result<()> {
    let col = (viewport.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row.min(viewport.rows - 1)))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Render one frame for the current phase
pub fn draw<W: Write>(
    out: &mut W,
    state: &GameState,
    ui: &UiState,
    settings: &Settings,
) -> std::io::Result<()> {
    let viewport = Viewport::current()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.phase {
        Phase::Menu => draw_menu(out, &viewport, ui, settings)?,
        Phase::Playing => {
            draw_world(out, &viewport, state, settings)?;
            draw_hud(out, &viewport, state, ui, settings)?;
        }
        Phase::Paused => draw_pause(out, &viewport, settings)?,
        Phase::Shop => draw_shop(out, &viewport, state, ui, settings)?,
        Phase::LevelTransition => draw_transition(out, &viewport, settings)?,
        Phase::GameOver => draw_end_screen(out, &viewport, state, settings, false)?,
        Phase::Victory => draw_end_screen(out, &viewport, state, settings, true)?,
    }

    out.queue(style::ResetColor)?;
    out.flush()
}

fn draw_world<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    state: &GameState,
    settings: &Settings,
) -> std::io::Result<()> {
    // Particles first so everything else draws over them
    for particle in &state.particles {
        if let Some((col, row)) = viewport.project(particle.pos) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(rgb(settings, particle.color)))?;
            out.queue(Print("·"))?;
        }
    }

    for coin in &state.coins {
        if let Some((col, row)) = viewport.project(coin.pos) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(rgb(settings, coin.kind.color())))?;
            out.queue(Print("$"))?;
        }
    }

    for rock in &state.rocks {
        if let Some((col, row)) = viewport.project(rock.pos) {
            out.queue(style::SetForegroundColor(tint(settings, Color::DarkGrey)))?;
            if rock.size >= 45.0 && col > 0 {
                out.queue(cursor::MoveTo(col - 1, row))?;
                out.queue(Print("###"))?;
            } else {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print("#"))?;
            }
        }
    }

    for projectile in &state.projectiles {
        if let Some((col, row)) = viewport.project(projectile.center()) {
            let color = if projectile.powered {
                Color::Magenta
            } else {
                Color::Yellow
            };
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(tint(settings, color)))?;
            out.queue(Print("|"))?;
        }
    }

    // Blink while invulnerable, matching the 100 ms cadence of the damage
    // flash
    let blink_hidden = state.player.invulnerable && (state.elapsed_ms / 100.0) as i64 % 2 == 0;
    if !blink_hidden {
        if let Some((col, row)) = viewport.project(state.player.center()) {
            out.queue(style::SetForegroundColor(tint(settings, Color::Cyan)))?;
            if col > 0 {
                out.queue(cursor::MoveTo(col - 1, row))?;
                out.queue(Print("◢▲◣"))?;
            } else {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print("▲"))?;
            }
        }
    }

    Ok(())
}

fn draw_hud<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    state: &GameState,
    ui: &UiState,
    settings: &Settings,
) -> std::io::Result<()> {
    let hearts = "♥".repeat(state.player.lives as usize);
    let mut hud = format!(
        "Score {:>5}  Level {}  Lives {:<3}  Target {}",
        state.score,
        state.level,
        hearts,
        state.level_target()
    );
    if state.has_power_projectile {
        hud.push_str("  [PWR]");
    }
    if state.level == 2 {
        hud.push_str("  T: shop");
    }
    if let Some(fps) = ui.fps {
        hud.push_str(&format!("  {fps} fps"));
    }

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(tint(settings, Color::White)))?;
    let max = viewport.cols as usize;
    let line: String = hud.chars().take(max).collect();
    out.queue(Print(line))?;
    Ok(())
}

fn draw_menu<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    ui: &UiState,
    settings: &Settings,
) -> std::io::Result<()> {
    let cy = viewport.rows / 2;
    match ui.menu_page {
        MenuPage::Main => {
            print_centered(
                out,
                viewport,
                cy.saturating_sub(4),
                tint(settings, Color::Yellow),
                "★  C O I N F A L L  ★",
            )?;
            print_centered(
                out,
                viewport,
                cy.saturating_sub(2),
                tint(settings, Color::White),
                "Shoot the falling coins, dodge the rocks",
            )?;
            print_centered(
                out,
                viewport,
                cy,
                tint(settings, Color::Green),
                "[Enter] Start",
            )?;
            print_centered(
                out,
                viewport,
                cy + 1,
                tint(settings, Color::White),
                "[I] Instructions",
            )?;
            print_centered(out, viewport, cy + 2, tint(settings, Color::White), "[Q] Quit")?;
        }
        MenuPage::Instructions => {
            let lines = [
                "Controls",
                "",
                "Arrows / WASD  move",
                "Space          shoot",
                "Esc / P        pause",
                "T              shop (level 2)",
                "",
                "Coins: $ bronze 15, silver 40, gold 100 points",
                "Touching a coin or a rock costs a life!",
                "",
                "[B] Back",
            ];
            let top = cy.saturating_sub(lines.len() as u16 / 2);
            for (i, line) in lines.iter().enumerate() {
                print_centered(
                    out,
                    viewport,
                    top + i as u16,
                    tint(settings, Color::White),
                    line,
                )?;
            }
        }
    }
    Ok(())
}

fn draw_pause<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    settings: &Settings,
) -> std::io::Result<()> {
    let cy = viewport.rows / 2;
    print_centered(
        out,
        viewport,
        cy.saturating_sub(2),
        tint(settings, Color::Yellow),
        "PAUSED",
    )?;
    print_centered(
        out,
        viewport,
        cy,
        tint(settings, Color::White),
        "[Enter] Resume   [R] Restart   [Q] Quit to menu",
    )?;
    Ok(())
}

fn draw_shop<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    state: &GameState,
    ui: &UiState,
    settings: &Settings,
) -> std::io::Result<()> {
    let cy = viewport.rows / 2;
    print_centered(
        out,
        viewport,
        cy.saturating_sub(4),
        tint(settings, Color::Yellow),
        "SHOP",
    )?;
    print_centered(
        out,
        viewport,
        cy.saturating_sub(2),
        tint(settings, Color::White),
        &format!("Points: {}", state.score),
    )?;
    let item = if state.has_power_projectile {
        "Powered projectile: owned".to_string()
    } else {
        format!("Powered projectile (double damage): {POWER_PROJECTILE_COST} pts")
    };
    print_centered(out, viewport, cy, tint(settings, Color::White), &item)?;

    if let Some(outcome) = ui.shop_message {
        let (text, color) = match outcome {
            ShopOutcome::Purchased => ("Powered projectile acquired!", Color::Green),
            ShopOutcome::AlreadyOwned => ("You already own this upgrade", Color::Yellow),
            ShopOutcome::InsufficientPoints => ("Not enough points", Color::Red),
        };
        print_centered(out, viewport, cy + 2, tint(settings, color), text)?;
    }

    print_centered(
        out,
        viewport,
        cy + 4,
        tint(settings, Color::White),
        "[B] Buy   [T] Close",
    )?;
    Ok(())
}

fn draw_transition<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    settings: &Settings,
) -> std::io::Result<()> {
    let cy = viewport.rows / 2;
    print_centered(
        out,
        viewport,
        cy.saturating_sub(2),
        tint(settings, Color::Green),
        "Level 1 complete!",
    )?;
    print_centered(
        out,
        viewport,
        cy,
        tint(settings, Color::White),
        "Bigger rocks ahead, and the shop opens (T)",
    )?;
    print_centered(
        out,
        viewport,
        cy + 2,
        tint(settings, Color::White),
        "[Enter] Continue",
    )?;
    Ok(())
}

fn draw_end_screen<W: Write>(
    out: &mut W,
    viewport: &Viewport,
    state: &GameState,
    settings: &Settings,
    victory: bool,
) -> std::io::Result<()> {
    let cy = viewport.rows / 2;
    let (title, color) = if victory {
        ("VICTORY!", Color::Green)
    } else {
        ("GAME OVER", Color::Red)
    };
    print_centered(out, viewport, cy.saturating_sub(2), tint(settings, color), title)?;
    print_centered(
        out,
        viewport,
        cy,
        tint(settings, Color::White),
        &format!("Final score: {}", state.score),
    )?;
    print_centered(
        out,
        viewport,
        cy + 2,
        tint(settings, Color::White),
        "[R] Play again   [M] Menu   [Q] Quit",
    )?;
    Ok(())
}
