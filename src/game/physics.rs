use rand::Rng;

use super::input::InputSet;
use super::state::{Ball, MatchState, MatchStatus, Side};
use crate::config::PhysicsConfig;

/// What happened during a tick, for logging and for the orchestrator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsEvents {
    pub paddle_hit: Option<Side>,
    pub wall_bounce: bool,
    /// Side that won the point
    pub point_scored: Option<Side>,
    pub match_won: Option<Side>,
}

impl PhysicsEvents {
    pub fn any(&self) -> bool {
        self.paddle_hit.is_some() || self.wall_bounce || self.point_scored.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub state: MatchState,
    pub events: PhysicsEvents,
}

/// Advance the match by one fixed tick.
///
/// Pure apart from `rng`, which only decides the vertical direction of a
/// serve. Outside `Playing` the state is returned unchanged.
pub fn step<R: Rng>(
    state: &MatchState,
    inputs: InputSet,
    physics: &PhysicsConfig,
    rng: &mut R,
) -> StepOutcome {
    let mut next = *state;
    let mut events = PhysicsEvents::default();

    if state.status != MatchStatus::Playing {
        return StepOutcome {
            state: next,
            events,
        };
    }

    for side in [Side::Left, Side::Right] {
        let paddle = next.paddle_mut(side);
        paddle.y = move_paddle(paddle.y, inputs.vertical(side), physics);
    }

    let prev = state.ball;
    let mut ball = prev;
    ball.x += prev.dx;
    ball.y += prev.dy;

    // Reflect from the pre-collision y so the ball never sinks into the wall
    if ball.y - ball.radius < 0.0 || ball.y + ball.radius > physics.board_height {
        ball.dy = -prev.dy;
        ball.y = prev.y + ball.dy;
        events.wall_bounce = true;
    }

    if let Some(side) = resolve_paddle_hit(&mut ball, prev.dx, &next, physics) {
        next.hit_counter += 1;
        ball.speed = speed_for_hit(next.hit_counter, prev.speed, physics);
        events.paddle_hit = Some(side);
    }

    enforce_speed(&mut ball, prev.dx);
    next.ball = ball;

    if let Some(scorer) = scoring_side(&ball, physics) {
        events.point_scored = Some(scorer);
        let total = next.score.award(scorer);

        if total >= physics.winning_score {
            next.status = MatchStatus::MatchOver { winner: scorer };
            events.match_won = Some(scorer);
        } else {
            // The side that conceded receives the serve
            next.ball = Ball::serve_random(physics, scorer.opponent(), rng);
            next.hit_counter = 0;
        }
    }

    debug_assert!(
        speed_matches_velocity(&next.ball),
        "speed {} != |v| {}",
        next.ball.speed,
        next.ball.velocity_norm()
    );

    StepOutcome {
        state: next,
        events,
    }
}

/// Move a paddle center by `direction` (-1, 0, +1) times its speed, kept on the board.
pub fn move_paddle(y: f32, direction: f32, physics: &PhysicsConfig) -> f32 {
    physics.clamp_paddle_y(y + direction * physics.paddle_speed)
}

/// Move a paddle toward a controller target by at most `max_speed`.
pub fn steer_toward(y: f32, target: f32, max_speed: f32, physics: &PhysicsConfig) -> f32 {
    let limit = max_speed.abs();
    let delta = (target - y).max(-limit).min(limit);
    physics.clamp_paddle_y(y + delta)
}

/// Ball speed after the `hit_count`-th paddle hit since the serve.
///
/// Linear ramp from the serve speed to the cruise speed over the first
/// `ramp_up_hits` hits, then multiplicative growth up to the maximum.
pub fn speed_for_hit(hit_count: u32, current_speed: f32, physics: &PhysicsConfig) -> f32 {
    let ramp = physics.ramp_up_hits;
    if ramp > 0 && hit_count <= ramp {
        let increment = (physics.cruise_ball_speed - physics.min_ball_speed) / ramp as f32;
        (physics.min_ball_speed + hit_count as f32 * increment).min(physics.cruise_ball_speed)
    } else {
        (current_speed * physics.speed_growth_factor).min(physics.max_ball_speed)
    }
}

fn resolve_paddle_hit(
    ball: &mut Ball,
    incoming_dx: f32,
    state: &MatchState,
    physics: &PhysicsConfig,
) -> Option<Side> {
    let r = ball.radius;

    if incoming_dx < 0.0 {
        let leading = ball.x - r;
        let paddle = state.left_paddle;
        if (0.0..=physics.paddle_width).contains(&leading) && paddle.spans(ball.y, physics) {
            ball.dx = -incoming_dx;
            ball.x = physics.paddle_width + r;
            ball.dy = (ball.y - paddle.y) * physics.deflection_factor;
            return Some(Side::Left);
        }
    } else if incoming_dx > 0.0 {
        let leading = ball.x + r;
        let face = physics.board_width - physics.paddle_width;
        let paddle = state.right_paddle;
        if (face..=physics.board_width).contains(&leading) && paddle.spans(ball.y, physics) {
            ball.dx = -incoming_dx;
            ball.x = face - r;
            ball.dy = (ball.y - paddle.y) * physics.deflection_factor;
            return Some(Side::Right);
        }
    }

    None
}

/// Rescale (dx, dy) to the scalar speed so |v| == speed holds after every tick.
fn enforce_speed(ball: &mut Ball, fallback_dx: f32) {
    let magnitude = ball.velocity_norm();
    if magnitude > 0.0 {
        ball.dx = ball.dx / magnitude * ball.speed;
        ball.dy = ball.dy / magnitude * ball.speed;
    } else {
        // Degenerate vector: keep the previous horizontal heading
        ball.dx = if fallback_dx < 0.0 { -ball.speed } else { ball.speed };
        ball.dy = 0.0;
    }
}

fn scoring_side(ball: &Ball, physics: &PhysicsConfig) -> Option<Side> {
    if ball.x - ball.radius < 0.0 {
        Some(Side::Right)
    } else if ball.x + ball.radius > physics.board_width {
        Some(Side::Left)
    } else {
        None
    }
}

pub fn speed_matches_velocity(ball: &Ball) -> bool {
    (ball.velocity_norm() - ball.speed).abs() <= 1e-3 * ball.speed.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::PaddleInput;
    use crate::game::state::Score;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    fn playing_state() -> MatchState {
        let physics = physics();
        let mut state = MatchState::new(&physics);
        state.start(&physics, &mut StdRng::seed_from_u64(0)).unwrap();
        state
    }

    fn ball_at(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball {
            x,
            y,
            dx,
            dy,
            speed: (dx * dx + dy * dy).sqrt(),
            radius: physics().ball_radius,
        }
    }

    fn run(state: &MatchState, inputs: InputSet) -> StepOutcome {
        step(state, inputs, &physics(), &mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_paddles_move_and_clamp() {
        let mut state = playing_state();
        state.left_paddle.y = 55.0;
        let inputs: InputSet = [PaddleInput::LeftUp, PaddleInput::RightDown].into_iter().collect();

        let out = run(&state, inputs);

        // 55 - 10 would leave the board; clamped to the half height
        assert_eq!(out.state.left_paddle.y, 50.0);
        assert_eq!(out.state.right_paddle.y, 310.0);
    }

    #[test]
    fn test_wall_bounce_reflects_from_previous_position() {
        let mut state = playing_state();
        state.ball = ball_at(400.0, 12.0, 0.0, -5.0);

        let out = run(&state, InputSet::empty());

        assert!(out.events.wall_bounce);
        assert_eq!(out.state.ball.dy, 5.0);
        assert_eq!(out.state.ball.y, 17.0);
    }

    #[test]
    fn test_left_paddle_hit_reverses_and_ramps() {
        let mut state = playing_state();
        state.ball = ball_at(24.0, 300.0, -1.0, 0.0);

        let out = run(&state, InputSet::empty());

        assert_eq!(out.events.paddle_hit, Some(Side::Left));
        assert_eq!(out.state.hit_counter, 1);
        let ball = out.state.ball;
        assert_eq!(ball.x, 25.0);
        assert!(ball.dx > 0.0);
        assert!((ball.speed - 1.08).abs() < 1e-6);
        assert!(speed_matches_velocity(&ball));
    }

    #[test]
    fn test_right_paddle_deflection_follows_contact_offset() {
        let mut state = playing_state();
        state.right_paddle.y = 300.0;
        // Below the paddle center: leaves going down
        state.ball = ball_at(772.0, 340.0, 4.0, 0.0);

        let out = run(&state, InputSet::empty());

        assert_eq!(out.events.paddle_hit, Some(Side::Right));
        let ball = out.state.ball;
        assert_eq!(ball.x, 775.0);
        assert!(ball.dx < 0.0);
        assert!(ball.dy > 0.0);
    }

    #[test]
    fn test_ball_moving_away_cannot_hit() {
        let mut state = playing_state();
        state.ball = ball_at(24.0, 300.0, 1.0, 0.0);

        let out = run(&state, InputSet::empty());

        assert_eq!(out.events.paddle_hit, None);
        assert_eq!(out.state.hit_counter, 0);
    }

    #[test]
    fn test_speed_ramp_reaches_cruise_then_grows() {
        let physics = physics();
        let mut speed = physics.min_ball_speed;
        for hit in 1..=physics.ramp_up_hits {
            speed = speed_for_hit(hit, speed, &physics);
        }
        assert!((speed - physics.cruise_ball_speed).abs() < 1e-4);

        let next = speed_for_hit(physics.ramp_up_hits + 1, speed, &physics);
        let expected = (physics.cruise_ball_speed * physics.speed_growth_factor).min(physics.max_ball_speed);
        assert!((next - expected).abs() < 1e-4);

        // Growth is capped
        assert_eq!(speed_for_hit(500, 14.9, &physics), physics.max_ball_speed);
    }

    #[test]
    fn test_miss_scores_and_serves_to_conceding_side() {
        let mut state = playing_state();
        state.hit_counter = 7;
        state.ball = ball_at(10.5, 100.0, -1.0, 0.0);

        let out = run(&state, InputSet::empty());

        assert_eq!(out.events.point_scored, Some(Side::Right));
        assert_eq!(out.state.score, Score { left: 0, right: 1 });
        assert_eq!(out.state.hit_counter, 0);
        assert_eq!((out.state.ball.x, out.state.ball.y), (400.0, 300.0));
        assert!(out.state.ball.is_moving_toward(Side::Left));
        assert_eq!(out.state.ball.speed, physics().min_ball_speed);
        assert!(out.state.is_playing());
    }

    #[test]
    fn test_rally_ramps_to_cruise_through_step() {
        let physics = physics();
        let mut state = playing_state();
        state.left_paddle.y = 300.0;

        for _ in 0..physics.ramp_up_hits {
            // Just in front of the left paddle, heading into it at the current speed
            let speed = state.ball.speed;
            state.ball = ball_at(24.0, 300.0, -speed, 0.0);
            let out = run(&state, InputSet::empty());
            assert_eq!(out.events.paddle_hit, Some(Side::Left));
            state = out.state;
        }

        assert_eq!(state.hit_counter, physics.ramp_up_hits);
        assert!((state.ball.speed - physics.cruise_ball_speed).abs() < 1e-4);

        let speed = state.ball.speed;
        state.ball = ball_at(24.0, 300.0, -speed, 0.0);
        let out = run(&state, InputSet::empty());
        let expected = physics.cruise_ball_speed * physics.speed_growth_factor;
        assert!((out.state.ball.speed - expected).abs() < 1e-4);
        assert!(speed_matches_velocity(&out.state.ball));
    }

    #[test]
    fn test_left_point_serves_toward_right() {
        let mut state = playing_state();
        state.hit_counter = 3;
        state.right_paddle.y = 300.0;
        // Past the right edge, well away from the right paddle
        state.ball = ball_at(789.5, 100.0, 1.0, 0.0);

        let out = run(&state, InputSet::empty());

        assert_eq!(out.events.point_scored, Some(Side::Left));
        assert_eq!(out.events.match_won, None);
        assert_eq!(out.state.score, Score { left: 1, right: 0 });
        assert_eq!(out.state.hit_counter, 0);
        assert_eq!((out.state.ball.x, out.state.ball.y), (400.0, 300.0));
        assert!(out.state.ball.is_moving_toward(Side::Right));
        assert_eq!(out.state.ball.speed, physics().min_ball_speed);
        assert!(out.state.is_playing());
    }

    #[test]
    fn test_winning_point_ends_match_and_freezes_state() {
        let mut state = playing_state();
        state.score = Score { left: 4, right: 2 };
        state.ball = ball_at(789.5, 50.0, 1.0, 0.0);

        let out = run(&state, InputSet::empty());

        assert_eq!(out.events.match_won, Some(Side::Left));
        assert_eq!(out.state.status, MatchStatus::MatchOver { winner: Side::Left });
        assert_eq!(out.state.score.left, 5);

        let inputs: InputSet = [PaddleInput::LeftDown].into_iter().collect();
        let frozen = run(&out.state, inputs);
        assert_eq!(frozen.state, out.state);
        assert!(!frozen.events.any());
    }

    #[test]
    fn test_step_is_noop_outside_playing() {
        let physics = physics();
        let state = MatchState::new(&physics);
        let inputs: InputSet = [PaddleInput::LeftUp].into_iter().collect();

        assert_eq!(run(&state, inputs).state, state);
    }

    #[test]
    fn test_serve_direction_is_reproducible_with_seed() {
        let mut state = playing_state();
        state.ball = ball_at(10.5, 100.0, -1.0, 0.0);
        let physics = physics();

        let a = step(&state, InputSet::empty(), &physics, &mut StdRng::seed_from_u64(99));
        let b = step(&state, InputSet::empty(), &physics, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.state.ball, b.state.ball);
    }

    #[test]
    fn test_steer_toward_is_bounded() {
        let physics = physics();
        assert_eq!(steer_toward(300.0, 308.0, 10.0, &physics), 308.0);
        assert_eq!(steer_toward(300.0, 400.0, 10.0, &physics), 310.0);
        assert_eq!(steer_toward(60.0, -500.0, 10.0, &physics), 50.0);
    }

    fn input_set() -> impl Strategy<Value = InputSet> {
        (0u8..16).prop_map(|bits| {
            PaddleInput::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, input)| input)
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_step_keeps_invariants(
            x in 11.0f32..789.0,
            y in 11.0f32..589.0,
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 1.0f32..15.0,
            left in 50.0f32..=550.0,
            right in 50.0f32..=550.0,
            hits in 0u32..80,
            inputs in input_set(),
            seed in any::<u64>(),
        ) {
            let physics = physics();
            let mut state = playing_state();
            state.ball = ball_at(x, y, angle.cos() * speed, angle.sin() * speed);
            state.left_paddle.y = left;
            state.right_paddle.y = right;
            state.hit_counter = hits;

            let mut rng = StdRng::seed_from_u64(seed);
            let mut current = state;
            for _ in 0..30 {
                current = step(&current, inputs, &physics, &mut rng).state;
                for paddle in [current.left_paddle, current.right_paddle] {
                    prop_assert!(paddle.y >= physics.half_paddle_height());
                    prop_assert!(paddle.y <= physics.board_height - physics.half_paddle_height());
                }
                prop_assert!(speed_matches_velocity(&current.ball));
                prop_assert!(current.ball.speed <= physics.max_ball_speed + 1e-3);
            }
        }

        #[test]
        fn prop_wall_bounce_preserves_vertical_speed(
            x in 100.0f32..700.0,
            dy in 1.0f32..10.0,
            dx in -3.0f32..3.0,
        ) {
            let mut state = playing_state();
            // Touching the top wall, heading into it
            state.ball = ball_at(x, 10.5, dx, -dy);
            let before = state.ball.dy.abs();

            let out = run(&state, InputSet::empty());
            prop_assert!(out.events.wall_bounce);
            prop_assert!((out.state.ball.dy.abs() - before).abs() < 1e-3);
            prop_assert!(out.state.ball.dy > 0.0);
        }
    }
}
