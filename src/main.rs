//! Terminal runner (default binary).
//!
//! crossterm for input, the framebuffer renderer for output and an engine
//! [`Driver`] for timing. Usage: `tui-link [easy|hard|endless|practice <level>]`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use crossterm::event::{self, Event};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tui_link::core::{Session, SessionSnapshot};
use tui_link::engine::Driver;
use tui_link::input::{handle_key_event, left_click, should_quit, Cursor, UiAction};
use tui_link::runtime::{JsonFileStore, RuntimeConfig};
use tui_link::term::{BellFeedback, FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_link::types::{Mode, SessionAction};

const USAGE: &str = "usage: tui-link [easy|hard|endless|practice <level>]";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(mode) = parse_mode(&args)? else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = RuntimeConfig::from_env();
    if let Some(path) = &config.log_path {
        init_logging(path)?;
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, mode);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// `None` when help was requested.
fn parse_mode(args: &[String]) -> Result<Option<Mode>> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let mode = match args.as_slice() {
        [] => Mode::ClassicEasy,
        ["-h" | "--help"] => return Ok(None),
        ["practice", level] => {
            let start_level: u32 = level
                .parse()
                .with_context(|| format!("invalid practice level {level:?}"))?;
            if start_level == 0 {
                bail!("practice levels start at 1");
            }
            Mode::Practice { start_level }
        }
        [name] => Mode::from_str(name).ok_or_else(|| anyhow!("unknown mode {name:?}\n{USAGE}"))?,
        _ => bail!(USAGE),
    };
    Ok(Some(mode))
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

fn run(term: &mut TerminalRenderer, config: &RuntimeConfig, mode: Mode) -> Result<()> {
    let seed = config.resolve_seed();
    info!(mode = mode.as_str(), seed, records = %config.records_path.display(), "starting");

    let session = Session::new(mode, seed)
        .with_store(JsonFileStore::open(&config.records_path))
        .with_feedback(BellFeedback::stdout());
    let mut driver = Driver::with_reveal_ms(session, config.reveal_ms);
    driver.start();

    let view = GameView::default();
    let board = driver.session().board();
    let mut cursor = Cursor::new(board.rows(), board.cols());
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();
    let mut last = Instant::now();
    let mut dirty = true;

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);

        if dirty {
            for ev in driver.session_mut().drain_events() {
                debug!(?ev, "session event");
            }
            driver.snapshot_into(&mut snap);
            view.render_into(&snap, Some(cursor.pos()), viewport, &mut fb);
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        // Input with timeout until the next scheduled tick or commit.
        let timeout = Duration::from_millis(u64::from(driver.next_deadline_ms()));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!(score = driver.session().score(), level = driver.session().level(), "quit");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        dirty |= match action {
                            UiAction::Move(dir) => cursor.step(dir),
                            UiAction::Tap => {
                                let pos = cursor.pos();
                                driver.apply(SessionAction::Tap { row: pos.row, col: pos.col })
                            }
                            UiAction::Hint => driver.apply(SessionAction::Hint),
                            UiAction::TogglePause => driver.apply(SessionAction::TogglePause),
                            UiAction::Restart => driver.apply(SessionAction::Restart),
                            UiAction::Continue => driver.apply(SessionAction::Continue),
                        };
                    }
                }
                Event::Mouse(mouse) => {
                    let cell = left_click(mouse)
                        .and_then(|(x, y)| view.cell_at(&snap, viewport, x, y));
                    if let Some(pos) = cell {
                        if cursor.set(pos) {
                            driver.apply(SessionAction::Tap { row: pos.row, col: pos.col });
                            dirty = true;
                        }
                    }
                }
                Event::Resize(..) => {
                    term.invalidate();
                    dirty = true;
                }
                _ => {}
            }
        }

        // Feed whole elapsed milliseconds to the driver, keeping the remainder.
        let elapsed_ms = last.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
        if elapsed_ms > 0 {
            last += Duration::from_millis(u64::from(elapsed_ms));
            dirty |= driver.advance(elapsed_ms).changed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_modes() {
        assert_eq!(parse_mode(&args(&[])).unwrap(), Some(Mode::ClassicEasy));
        assert_eq!(parse_mode(&args(&["hard"])).unwrap(), Some(Mode::ClassicHard));
        assert_eq!(parse_mode(&args(&["endless"])).unwrap(), Some(Mode::Endless));
        assert_eq!(
            parse_mode(&args(&["practice", "9"])).unwrap(),
            Some(Mode::Practice { start_level: 9 })
        );
        assert_eq!(parse_mode(&args(&["--help"])).unwrap(), None);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_mode(&args(&["medium"])).is_err());
        assert!(parse_mode(&args(&["practice", "0"])).is_err());
        assert!(parse_mode(&args(&["practice", "x"])).is_err());
        assert!(parse_mode(&args(&["easy", "hard"])).is_err());
    }
}
