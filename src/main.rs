//! Terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `sumfall::term`.
//! The engine is driven with a fixed timestep; everything time-based (match
//! delays, the time-mode countdown) happens inside `GameState::advance`.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sumfall::core::{EngineConfig, EngineEvent, GameState, SequentialIds};
use sumfall::host::{HostConfig, Session};
use sumfall::input::{handle_key_event, should_quit};
use sumfall::logging;
use sumfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use sumfall::types::TICK_MS;

fn main() -> Result<()> {
    let host = HostConfig::from_env();
    if let Some(path) = host.log_path.as_deref() {
        logging::init_file(path, LevelFilter::Debug)?;
    }

    let config = EngineConfig::from_env();
    config.validate()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &host, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    log::logger().flush();
    result
}

fn run(term: &mut TerminalRenderer, host: &HostConfig, config: EngineConfig) -> Result<()> {
    let rng = match host.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(config.rows, config.cols, host.difficulty);
    let mut game = GameState::with_sources(config, rng, SequentialIds::new())?;

    log::info!(
        "sumfall starting: seed={:?} difficulty={}",
        host.seed,
        host.difficulty.as_str()
    );

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let snap = game.snapshot();
        view.render_into(&snap, session.cursor_pos(&game), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        log::info!("quit at score {}", game.score());
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        session.handle(&mut game, action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);

            for event in game.advance(elapsed_ms) {
                match event {
                    EngineEvent::MatchResolved(m) => {
                        log::info!("match +{} (combo x{})", m.points, m.combo)
                    }
                    EngineEvent::GameOver => log::info!("game over at score {}", game.score()),
                    other => log::trace!("{:?}", other),
                }
            }
        }
    }
}
