mod display;

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use log::{debug, info};

use coinfall::Settings;
use coinfall::sim::{self, GameState, Phase, TickInput};
use display::{MenuPage, UiState};

/// Target frame duration, matching the simulation step
const FRAME: Duration = Duration::from_millis(16);
/// Frames a key stays "held" after its last event. Terminals only deliver
/// key repeats, so a small window bridges the gap between repeat events.
const HOLD_WINDOW: u64 = 4;

fn main() -> io::Result<()> {
    env_logger::init();

    let settings = Settings::load();
    settings.save();

    let seed = settings.seed.unwrap_or_else(rand::random);
    info!("starting with seed {seed}");
    let mut state = GameState::new(seed);
    let mut ui = UiState::default();

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut stdout, &mut state, &mut ui, &settings);

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run<W: Write>(
    out: &mut W,
    state: &mut GameState,
    ui: &mut UiState,
    settings: &Settings,
) -> io::Result<()> {
    // Blocking event reads happen on their own thread so the frame loop
    // never stalls waiting for input
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    let mut held: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut fps_frames: u32 = 0;
    let mut fps_clock = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        let mut input = TickInput::default();
        let mut quit = false;

        for ev in rx.try_iter() {
            let Event::Key(key) = ev else { continue };
            let code = match key.code {
                KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
                other => other,
            };
            if key.kind == KeyEventKind::Release {
                held.remove(&code);
                continue;
            }
            held.insert(code, frame);

            if key.modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                quit = true;
                continue;
            }
            handle_press(code, state, ui, &mut input, &mut quit);
        }
        if quit {
            return Ok(());
        }

        let down = |code: KeyCode| {
            held.get(&code)
                .is_some_and(|&stamp| frame.saturating_sub(stamp) <= HOLD_WINDOW)
        };
        input.left = down(KeyCode::Left) || down(KeyCode::Char('a'));
        input.right = down(KeyCode::Right) || down(KeyCode::Char('d'));
        input.up = down(KeyCode::Up) || down(KeyCode::Char('w'));
        input.down = down(KeyCode::Down) || down(KeyCode::Char('s'));
        input.fire = down(KeyCode::Char(' '));

        sim::tick(state, &input);

        if state.phase != Phase::Shop {
            ui.shop_message = None;
        }

        if settings.show_fps {
            fps_frames += 1;
            if fps_clock.elapsed() >= Duration::from_secs(1) {
                ui.fps = Some(fps_frames);
                debug!("{fps_frames} fps");
                fps_frames = 0;
                fps_clock = Instant::now();
            }
        }

        display::draw(out, state, ui, settings)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

/// One-shot key handling, dispatched by phase. Held movement keys are
/// sampled separately each frame.
fn handle_press(
    code: KeyCode,
    state: &mut GameState,
    ui: &mut UiState,
    input: &mut TickInput,
    quit: &mut bool,
) {
    match state.phase {
        Phase::Menu => match (ui.menu_page, code) {
            (MenuPage::Main, KeyCode::Enter) => state.start_game(),
            (MenuPage::Main, KeyCode::Char('i')) => ui.menu_page = MenuPage::Instructions,
            (MenuPage::Main, KeyCode::Char('q') | KeyCode::Esc) => *quit = true,
            (MenuPage::Instructions, KeyCode::Char('b') | KeyCode::Esc) => {
                ui.menu_page = MenuPage::Main;
            }
            _ => {}
        },
        Phase::Playing => match code {
            KeyCode::Esc | KeyCode::Char('p') => input.pause = true,
            KeyCode::Char('t') => input.shop = true,
            _ => {}
        },
        Phase::Paused => match code {
            KeyCode::Enter => state.resume(),
            KeyCode::Esc | KeyCode::Char('p') => input.pause = true,
            KeyCode::Char('r') => state.start_game(),
            KeyCode::Char('q') => state.back_to_menu(),
            _ => {}
        },
        Phase::Shop => match code {
            KeyCode::Char('b') | KeyCode::Enter => {
                ui.shop_message = Some(state.buy_power_projectile());
            }
            KeyCode::Char('t') | KeyCode::Esc => state.close_shop(),
            _ => {}
        },
        Phase::LevelTransition => match code {
            KeyCode::Enter | KeyCode::Char('c') => state.continue_to_next_level(),
            _ => {}
        },
        Phase::GameOver | Phase::Victory => match code {
            KeyCode::Char('r') | KeyCode::Enter => state.start_game(),
            KeyCode::Char('m') => state.back_to_menu(),
            KeyCode::Char('q') => *quit = true,
            _ => {}
        },
    }
}
