//! Match orchestration
//!
//! `MatchSession` is the only writer of the live `MatchState`. Each tick it
//! merges the latest controller target into the AI paddle, runs one physics
//! step, and asks the bot for a fresh target on its own (slower) cadence.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use crate::ai::{Bot, ControllerInput};
use crate::config::{AIConfig, PhysicsConfig};
use crate::game::{physics, InputSet, MatchState, MatchStatus, PhysicsEvents, Side, TransitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    HumanVsHuman,
    HumanVsAi,
}

impl GameMode {
    pub fn winner_text(&self, winner: Side) -> &'static str {
        match (self, winner) {
            (_, Side::Left) => "Player 1 Wins!",
            (GameMode::HumanVsAi, Side::Right) => "AI Wins!",
            (GameMode::HumanVsHuman, Side::Right) => "Player 2 Wins!",
        }
    }
}

pub struct MatchSession {
    physics: PhysicsConfig,
    mode: GameMode,
    state: MatchState,
    bot: Option<Box<dyn Bot>>,
    ai_target: Option<f32>,
    rng: StdRng,
    tick_duration: Duration,
    poll_interval: Duration,
    since_poll: Duration,
}

impl MatchSession {
    /// Two humans on one keyboard
    pub fn local(physics: PhysicsConfig, tick_duration: Duration) -> Self {
        Self::build(physics, GameMode::HumanVsHuman, None, tick_duration, Duration::ZERO)
    }

    /// Left paddle human, right paddle driven by `bot`
    pub fn vs_ai(
        physics: PhysicsConfig,
        bot: Box<dyn Bot>,
        ai: &AIConfig,
        tick_duration: Duration,
    ) -> Self {
        Self::build(
            physics,
            GameMode::HumanVsAi,
            Some(bot),
            tick_duration,
            Duration::from_millis(ai.poll_interval_ms),
        )
    }

    fn build(
        physics: PhysicsConfig,
        mode: GameMode,
        bot: Option<Box<dyn Bot>>,
        tick_duration: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            state: MatchState::new(&physics),
            physics,
            mode,
            bot,
            ai_target: None,
            rng: StdRng::from_entropy(),
            tick_duration,
            poll_interval,
            since_poll: Duration::ZERO,
        }
    }

    /// Replace the serve randomness, for deterministic replays
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn ai_target(&self) -> Option<f32> {
        self.ai_target
    }

    pub fn bot_name(&self) -> Option<&str> {
        self.bot.as_deref().map(|bot| bot.name())
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.state.start(&self.physics, &mut self.rng)?;
        self.ai_target = None;
        // Poll on the first tick, then every interval
        self.since_poll = self.poll_interval.saturating_sub(self.tick_duration);
        tracing::info!("Match started ({:?})", self.mode);
        Ok(())
    }

    pub fn abort(&mut self) -> Result<(), TransitionError> {
        self.state.abort()?;
        self.stop_ai();
        tracing::info!("Match aborted");
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), TransitionError> {
        self.state.restart()?;
        self.stop_ai();
        Ok(())
    }

    /// match-over -> menu -> playing
    pub fn rematch(&mut self) -> Result<(), TransitionError> {
        self.restart()?;
        self.start()
    }

    /// Advance one fixed tick. A no-op unless the match is playing.
    pub fn tick(&mut self, inputs: InputSet) -> PhysicsEvents {
        if !self.state.is_playing() {
            return PhysicsEvents::default();
        }

        let inputs = match self.mode {
            GameMode::HumanVsHuman => inputs,
            GameMode::HumanVsAi => inputs.without_side(Side::Right),
        };

        if let Some(target) = self.bot.as_mut().and_then(|bot| bot.poll_target()) {
            self.ai_target = Some(target);
        }
        if let (GameMode::HumanVsAi, Some(target)) = (self.mode, self.ai_target) {
            let paddle = &mut self.state.right_paddle;
            paddle.y = physics::steer_toward(paddle.y, target, self.physics.paddle_speed, &self.physics);
        }

        let outcome = physics::step(&self.state, inputs, &self.physics, &mut self.rng);
        self.state = outcome.state;
        let events = outcome.events;

        if let Some(side) = events.paddle_hit {
            tracing::debug!(
                "{:?} paddle hit #{}, speed {:.2}",
                side,
                self.state.hit_counter,
                self.state.ball.speed
            );
        }
        if let Some(scorer) = events.point_scored {
            tracing::info!(
                "{:?} scores: {} - {}",
                scorer,
                self.state.score.left,
                self.state.score.right
            );
        }

        if let MatchStatus::MatchOver { winner } = self.state.status {
            tracing::info!("Match over: {}", self.mode.winner_text(winner));
            self.stop_ai();
            return events;
        }

        self.poll_controller();
        events
    }

    fn poll_controller(&mut self) {
        if self.bot.is_none() {
            return;
        }
        self.since_poll += self.tick_duration;
        if self.since_poll < self.poll_interval {
            return;
        }
        // Keep the remainder so the cadence does not drift when the tick
        // length does not divide the interval. At most one request per tick.
        self.since_poll -= self.poll_interval;
        if self.since_poll >= self.poll_interval {
            self.since_poll = Duration::ZERO;
        }

        let observation = self.observation();
        if let Some(bot) = self.bot.as_mut() {
            bot.request(observation);
        }
    }

    /// What the AI (right paddle) sees
    pub fn observation(&self) -> ControllerInput {
        let ball = &self.state.ball;
        ControllerInput {
            ball_x: ball.x,
            ball_y: ball.y,
            ball_dx: ball.dx,
            ball_dy: ball.dy,
            paddle_y: self.state.right_paddle.y,
            opponent_paddle_y: self.state.left_paddle.y,
            board_height: self.physics.board_height,
            paddle_height: self.physics.paddle_height,
            is_ball_moving_towards_ai: ball.is_moving_toward(Side::Right),
            paddle_speed: self.physics.paddle_speed,
        }
    }

    fn stop_ai(&mut self) {
        if let Some(bot) = self.bot.as_mut() {
            bot.cancel();
        }
        self.ai_target = None;
        self.since_poll = Duration::ZERO;
    }
}
