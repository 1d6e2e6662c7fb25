//! Common utilities shared by the local and AI game modes
//!
//! Both modes run the same terminal loop around a `MatchSession`; they only
//! differ in how the session is built and what the HUD says.

use std::time::{Duration, Instant};

use ratatui::backend::Backend;
use ratatui::Terminal;

use super::session::MatchSession;
use crate::config::Config;
use crate::game::{poll_input, InputAction, KeyMap, KeyTracker, MatchStatus};
use crate::ui::{self, Hud, OverlayMessage};

/// Highest frame rate `for_fps` honours; anything above gets a 1 ms tick
pub const MAX_FPS: u64 = 1000;

/// Converts elapsed wall time into whole simulation ticks.
///
/// Leftover time carries over to the next frame. After a long stall at most
/// `max_ticks` are replayed and the rest of the backlog is dropped.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick: Duration,
    accumulator: Duration,
    max_ticks: u32,
}

impl FixedTimestep {
    pub fn new(tick: Duration, max_ticks: u32) -> Self {
        Self {
            tick,
            accumulator: Duration::ZERO,
            max_ticks,
        }
    }

    /// Tick length for a frame rate, clamped to `1..=MAX_FPS`
    pub fn for_fps(fps: u64) -> Self {
        let fps = fps.clamp(1, MAX_FPS) as u32;
        Self::new(Duration::from_secs(1) / fps, 5)
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Add `elapsed` and return how many ticks to run now
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.tick.is_zero() {
            return 0;
        }
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.tick && ticks < self.max_ticks {
            self.accumulator -= self.tick;
            ticks += 1;
        }
        if ticks == self.max_ticks {
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

/// Sleep away whatever is left of the frame.
pub fn limit_frame_rate(frame_start: Instant, frame: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame {
        std::thread::sleep(frame - elapsed);
    }
}

/// Drive `session` from the terminal until the player leaves the match.
///
/// Starts the match, then each frame: reads keys, runs as many fixed ticks as
/// wall time allows, and draws. Returns once the session is back in the menu.
pub fn run_session<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    session: &mut MatchSession,
    hud: &Hud,
) -> anyhow::Result<()> {
    let keymap = KeyMap::from_bindings(&config.keybindings);
    let mut tracker = KeyTracker::new(Duration::from_millis(config.display.key_hold_ms));
    let mut timestep = FixedTimestep::for_fps(config.display.target_fps);
    let frame = timestep.tick();

    session.start()?;
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();

        for action in poll_input(&keymap, &mut tracker)? {
            match action {
                InputAction::Abort => {
                    let status = session.state().status;
                    match status {
                        MatchStatus::MatchOver { .. } => session.restart()?,
                        _ => session.abort()?,
                    }
                    return Ok(());
                }
                InputAction::Rematch => {
                    if session.state().winner().is_some() {
                        tracker.clear();
                        timestep.reset();
                        session.rematch()?;
                    }
                }
                InputAction::Paddle(_) => {}
            }
        }

        let ticks = timestep.advance(now.saturating_duration_since(last_frame));
        last_frame = now;
        for _ in 0..ticks {
            session.tick(tracker.held(Instant::now()));
        }

        let overlay = session.state().winner().map(|winner| {
            OverlayMessage::info(vec![
                session.mode().winner_text(winner).to_string(),
                String::new(),
                format!(
                    "{} to Rematch  |  {} for Menu",
                    config.keybindings.rematch, config.keybindings.abort
                ),
            ])
        });

        terminal.draw(|f| {
            ui::render(
                f,
                session.state(),
                session.physics(),
                &config.display,
                hud,
                overlay.as_ref(),
            )
        })?;

        limit_frame_rate(now, frame);
    }
}
