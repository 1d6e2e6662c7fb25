use rand::Rng;
use thiserror::Error;

use crate::config::PhysicsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Horizontal sign of travel toward this side
    pub fn direction(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    /// Always the length of (dx, dy) once a step has finished
    pub speed: f32,
    pub radius: f32,
}

impl Ball {
    /// A freshly served ball: board center, diagonal direction, minimum speed.
    pub fn serve(physics: &PhysicsConfig, toward: Side, up: bool) -> Self {
        let component = physics.min_ball_speed / std::f32::consts::SQRT_2;
        let vertical = if up { -1.0 } else { 1.0 };
        Self {
            x: physics.board_width / 2.0,
            y: physics.board_height / 2.0,
            dx: toward.direction() * component,
            dy: vertical * component,
            speed: physics.min_ball_speed,
            radius: physics.ball_radius,
        }
    }

    /// Serve with the vertical direction drawn from `rng`
    pub fn serve_random<R: Rng>(physics: &PhysicsConfig, toward: Side, rng: &mut R) -> Self {
        Self::serve(physics, toward, rng.gen_bool(0.5))
    }

    pub fn velocity_norm(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    pub fn is_moving_toward(&self, side: Side) -> bool {
        self.dx * side.direction() > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    /// Vertical center
    pub y: f32,
}

impl Paddle {
    pub fn centered(physics: &PhysicsConfig) -> Self {
        Self {
            y: physics.board_height / 2.0,
        }
    }

    pub fn top(&self, physics: &PhysicsConfig) -> f32 {
        self.y - physics.half_paddle_height()
    }

    pub fn bottom(&self, physics: &PhysicsConfig) -> f32 {
        self.y + physics.half_paddle_height()
    }

    /// Strictly inside the paddle's vertical extent
    pub fn spans(&self, y: f32, physics: &PhysicsConfig) -> bool {
        y > self.top(physics) && y < self.bottom(physics)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Add a point for `side`, returning its new total
    pub fn award(&mut self, side: Side) -> u32 {
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot += 1;
        *slot
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Menu,
    Playing,
    MatchOver { winner: Side },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {from:?}")]
pub struct TransitionError {
    pub from: MatchStatus,
    pub action: &'static str,
}

/// Everything a frame needs. Owned by the orchestrator, advanced by `physics::step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchState {
    pub ball: Ball,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub score: Score,
    /// Paddle hits since the last serve
    pub hit_counter: u32,
    pub status: MatchStatus,
}

impl MatchState {
    pub fn new(physics: &PhysicsConfig) -> Self {
        Self {
            ball: Ball::serve(physics, Side::Left, false),
            left_paddle: Paddle::centered(physics),
            right_paddle: Paddle::centered(physics),
            score: Score::default(),
            hit_counter: 0,
            status: MatchStatus::Menu,
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left_paddle,
            Side::Right => &self.right_paddle,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left_paddle,
            Side::Right => &mut self.right_paddle,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == MatchStatus::Playing
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status {
            MatchStatus::MatchOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// menu -> playing: fresh scores, centered paddles, serve to the left player
    pub fn start<R: Rng>(
        &mut self,
        physics: &PhysicsConfig,
        rng: &mut R,
    ) -> Result<(), TransitionError> {
        if self.status != MatchStatus::Menu {
            return Err(TransitionError {
                from: self.status,
                action: "start",
            });
        }

        *self = Self {
            ball: Ball::serve_random(physics, Side::Left, rng),
            status: MatchStatus::Playing,
            ..Self::new(physics)
        };
        Ok(())
    }

    /// menu/playing -> menu
    pub fn abort(&mut self) -> Result<(), TransitionError> {
        match self.status {
            MatchStatus::Menu | MatchStatus::Playing => {
                self.status = MatchStatus::Menu;
                Ok(())
            }
            from => Err(TransitionError {
                from,
                action: "abort",
            }),
        }
    }

    /// match-over -> menu
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        match self.status {
            MatchStatus::MatchOver { .. } => {
                self.status = MatchStatus::Menu;
                Ok(())
            }
            from => Err(TransitionError {
                from,
                action: "restart",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_serve_is_centered_at_min_speed() {
        let physics = PhysicsConfig::default();
        let ball = Ball::serve(&physics, Side::Right, true);

        assert_eq!((ball.x, ball.y), (400.0, 300.0));
        assert!(ball.dx > 0.0);
        assert!(ball.dy < 0.0);
        assert!((ball.velocity_norm() - physics.min_ball_speed).abs() < 1e-6);
        assert_eq!(ball.speed, physics.min_ball_speed);
        assert!(ball.is_moving_toward(Side::Right));
    }

    #[test]
    fn test_state_machine_transitions() {
        let physics = PhysicsConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = MatchState::new(&physics);
        assert_eq!(state.status, MatchStatus::Menu);

        // Restart is only valid from match-over
        assert!(state.restart().is_err());

        state.start(&physics, &mut rng).unwrap();
        assert!(state.is_playing());
        assert!(state.ball.is_moving_toward(Side::Left));

        // Already playing
        let err = state.start(&physics, &mut rng).unwrap_err();
        assert_eq!(err.from, MatchStatus::Playing);

        state.abort().unwrap();
        assert_eq!(state.status, MatchStatus::Menu);

        state.status = MatchStatus::MatchOver { winner: Side::Left };
        assert!(state.abort().is_err());
        assert_eq!(state.winner(), Some(Side::Left));
        state.restart().unwrap();
        assert_eq!(state.status, MatchStatus::Menu);
    }

    #[test]
    fn test_start_resets_match() {
        let physics = PhysicsConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = MatchState::new(&physics);
        state.score = Score { left: 3, right: 4 };
        state.hit_counter = 9;
        state.left_paddle.y = 50.0;

        state.start(&physics, &mut rng).unwrap();

        assert_eq!(state.score, Score::default());
        assert_eq!(state.hit_counter, 0);
        assert_eq!(state.left_paddle.y, 300.0);
    }

    #[test]
    fn test_score_award() {
        let mut score = Score::default();
        assert_eq!(score.award(Side::Right), 1);
        assert_eq!(score.award(Side::Right), 2);
        assert_eq!(score.get(Side::Left), 0);
        assert_eq!(score.get(Side::Right), 2);
    }
}
