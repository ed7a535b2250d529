//! Terminal merge game runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from the term crate.
//! Each drop is resolved by the session at once; the playback only animates
//! the resulting plan, and game input waits until it is done.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::terminal;
use tracing::{error, info, warn};

use tui_merge::cli::{load_config, parse_tui_args};
use tui_merge::core::{GameSnapshot, Session};
use tui_merge::engine::Playback;
use tui_merge::input::{handle_key_event, should_quit, ColumnCursor, CursorCommand};
use tui_merge::logging;
use tui_merge::term::{FrameBuffer, GameView, Overlay, TerminalRenderer, Viewport};
use tui_merge::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_tui_args(&args)?;
    if let Some(path) = &args.log {
        logging::init_file(path)?;
    }
    let config = load_config(args.config.as_deref(), args.seed)?;
    let session = Session::from_config(&config)?;
    info!(
        columns = config.columns,
        rows = config.rows,
        seed = config.seed,
        "starting game"
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session);

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        error!(?err, "failed to restore terminal");
    }
    result
}

struct App {
    session: Session,
    cursor: ColumnCursor,
    playback: Playback,
    snapshot: GameSnapshot,
    message: Option<String>,
}

impl App {
    fn new(session: Session) -> Self {
        let snapshot = session.snapshot();
        Self {
            cursor: ColumnCursor::new(session.grid().columns() as usize),
            session,
            playback: Playback::new(),
            snapshot,
            message: None,
        }
    }

    fn apply(&mut self, action: GameAction) {
        match self.cursor.apply(action) {
            CursorCommand::None => return,
            CursorCommand::Drop(column) => match self.session.spawn(column) {
                Ok(plan) => {
                    info!(
                        column,
                        value = %plan.value,
                        points = plan.points(),
                        merges = plan.stats.merges,
                        "drop"
                    );
                    self.playback.start(&plan);
                    self.message = None;
                }
                Err(err) => {
                    warn!(column, error = %err, "drop rejected");
                    self.message = Some(err.to_string());
                }
            },
            CursorCommand::Restart => {
                info!(
                    episode = self.session.episode_id(),
                    score = self.session.score(),
                    "restart"
                );
                self.session.restart();
                self.playback.skip();
                self.message = None;
            }
        }
        self.session.snapshot_into(&mut self.snapshot);
    }

    fn render(&self, view: &GameView, viewport: Viewport, fb: &mut FrameBuffer) {
        let falling = self
            .playback
            .falling()
            .map(|(pos, value)| (pos, self.session.block_snapshot(value)));
        let overlay = Overlay {
            cursor: Some(self.cursor.column()),
            falling,
            flashing: self.playback.flashing(),
            message: self.message.as_deref(),
        };
        view.render_into(&self.snapshot, &overlay, viewport, fb);
    }
}

fn run(term: &mut TerminalRenderer, session: Session) -> Result<()> {
    let view = GameView::default();
    let mut app = App::new(session);
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();
    let mut dirty = true;

    loop {
        if dirty {
            let (w, h) = terminal::size().unwrap_or((80, 24));
            app.render(&view, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!(score = app.session.score(), "quit");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        if app.playback.is_idle() {
                            app.apply(action);
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

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            dirty |= app.playback.tick(elapsed_ms);
        }
    }
}
