//! Per-frame simulation tick
//!
//! One entry point advances the session state machine and the particle
//! field. Elapsed hold time is derived from the wall-clock `now_ms` the
//! caller samples, never from accumulated per-tick deltas, so frame-rate
//! variance cannot skew the timing.

use super::state::{ReactorEvent, ReactorState, SessionPhase};
use super::{Difficulty, Shape};

/// Input events for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Hold button pressed this frame
    pub press: bool,
    /// Hold button released this frame
    pub release: bool,
    /// Difficulty selector changed
    pub set_difficulty: Option<Difficulty>,
    /// Shape selector changed
    pub set_shape: Option<Shape>,
    /// Dismiss the completion result
    pub reset: bool,
}

/// Advance the reactor by one tick.
///
/// Tie-break: completion is evaluated before release is acted on, so a
/// release arriving in the same tick the hold reaches 100% loses and the
/// session completes.
pub fn tick(state: &mut ReactorState, input: &TickInput, now_ms: f64) -> Vec<ReactorEvent> {
    let mut events = Vec::new();

    // Selection changes first. A switch mid-hold cancels the session; the
    // field is rebuilt wholesale, so no explosion is fired.
    let mut switched = false;
    if let Some(difficulty) = input.set_difficulty {
        if difficulty != state.difficulty {
            state.difficulty = difficulty;
            switched = true;
        }
    }
    if let Some(shape) = input.set_shape {
        if shape != state.shape {
            state.shape = shape;
            switched = true;
        }
    }
    if switched {
        if state.phase == SessionPhase::Holding {
            log::info!("selection changed mid-hold, session cancelled");
            state.phase = SessionPhase::Idle;
            state.progress = 0.0;
        }
        let count = state.field.count();
        state.rebuild_field(count);
    }

    match state.phase {
        SessionPhase::Idle => {
            if input.press {
                state.phase = SessionPhase::Holding;
                state.hold_started_ms = now_ms;
                state.progress = 0.0;
                events.push(ReactorEvent::HoldStarted);
            }
        }

        SessionPhase::Holding => {
            // Clamped and kept monotone: a clock stepping backwards can
            // neither lower progress nor complete the hold early.
            let duration_ms = state.difficulty.profile().hold_duration_ms as f64;
            let elapsed_ms = now_ms - state.hold_started_ms;
            let percent = ((elapsed_ms / duration_ms) * 100.0).clamp(0.0, 100.0) as f32;
            state.progress = state.progress.max(percent);

            if state.progress >= 100.0 {
                state.progress = 100.0;
                state.completed_elapsed_seconds = elapsed_ms / 1000.0;
                state.phase = SessionPhase::Completed;
                events.push(ReactorEvent::Completed {
                    elapsed_seconds: state.completed_elapsed_seconds,
                    difficulty: state.difficulty,
                    shape: state.shape,
                });
            } else if input.release {
                state.phase = SessionPhase::Idle;
                state.progress = 0.0;
                state.field.explode(state.difficulty.profile().release_boost);
                events.push(ReactorEvent::HoldBroken);
            }
        }

        SessionPhase::Completed => {
            // Only an explicit reset leaves Completed; progress stays frozen
            // at 100 until then.
            if input.reset {
                state.phase = SessionPhase::Idle;
                state.progress = 0.0;
            }
        }
    }

    state.field.tick(state.field_mode());
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FieldMode;

    const FRAME_MS: f64 = 16.0;

    fn press() -> TickInput {
        TickInput {
            press: true,
            ..Default::default()
        }
    }

    fn release() -> TickInput {
        TickInput {
            release: true,
            ..Default::default()
        }
    }

    /// Drive the state with empty input at a fixed frame cadence
    fn run_frames(state: &mut ReactorState, start_ms: f64, frames: usize) -> Vec<ReactorEvent> {
        let mut events = Vec::new();
        for f in 0..frames {
            let now = start_ms + (f as f64 + 1.0) * FRAME_MS;
            events.extend(tick(state, &TickInput::default(), now));
        }
        events
    }

    #[test]
    fn test_press_starts_hold() {
        let mut state = ReactorState::new(1);
        let events = tick(&mut state, &press(), 1000.0);
        assert_eq!(state.phase, SessionPhase::Holding);
        assert_eq!(state.hold_started_ms, 1000.0);
        assert_eq!(events, vec![ReactorEvent::HoldStarted]);
        assert_eq!(state.field_mode(), FieldMode::Converging);
    }

    #[test]
    fn test_full_hold_completes_with_accurate_elapsed() {
        // Easy tier: 3000 ms hold
        let mut state = ReactorState::new(2);
        tick(&mut state, &press(), 0.0);

        let events = run_frames(&mut state, 0.0, 200);
        assert_eq!(state.phase, SessionPhase::Completed);
        assert_eq!(state.progress, 100.0);

        let completed: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, ReactorEvent::Completed { .. }))
            .collect();
        assert_eq!(completed.len(), 1);
        if let ReactorEvent::Completed {
            elapsed_seconds,
            difficulty,
            shape,
        } = completed[0]
        {
            assert!((*elapsed_seconds - 3.0).abs() < 0.05);
            assert_eq!(*difficulty, Difficulty::Easy);
            assert_eq!(*shape, Shape::Orb);
        }
    }

    #[test]
    fn test_early_release_resets_and_explodes() {
        let mut state = ReactorState::new(3);
        tick(&mut state, &press(), 0.0);
        run_frames(&mut state, 0.0, 90); // ~1.5 s of a 3 s hold
        assert!(state.progress > 0.0 && state.progress < 100.0);

        let events = tick(&mut state, &release(), 1500.0);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.progress, 0.0);
        assert_eq!(events, vec![ReactorEvent::HoldBroken]);
        assert_eq!(state.field_mode(), FieldMode::Chaotic);
    }

    #[test]
    fn test_same_tick_completion_beats_release() {
        let mut state = ReactorState::new(4);
        tick(&mut state, &press(), 0.0);
        // Release lands on the exact tick the hold crosses 100%
        let events = tick(&mut state, &release(), 3000.0);
        assert_eq!(state.phase, SessionPhase::Completed);
        assert!(matches!(events[0], ReactorEvent::Completed { .. }));
    }

    #[test]
    fn test_release_after_completion_is_ignored() {
        let mut state = ReactorState::new(5);
        tick(&mut state, &press(), 0.0);
        tick(&mut state, &TickInput::default(), 3000.0);
        assert_eq!(state.phase, SessionPhase::Completed);

        tick(&mut state, &release(), 3016.0);
        assert_eq!(state.phase, SessionPhase::Completed);
        assert_eq!(state.progress, 100.0);
    }

    #[test]
    fn test_backwards_clock_never_lowers_progress() {
        let mut state = ReactorState::new(6);
        tick(&mut state, &press(), 1000.0);
        tick(&mut state, &TickInput::default(), 2500.0); // 50% of easy
        let at_half = state.progress;
        assert!(at_half > 49.0 && at_half < 51.0);

        // Clock steps backwards past the hold start
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.phase, SessionPhase::Holding);
        assert!(state.progress >= at_half);
        assert!(state.progress < 100.0);
    }

    #[test]
    fn test_switch_difficulty_mid_hold_cancels() {
        let mut state = ReactorState::new(7);
        tick(&mut state, &press(), 0.0);
        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.phase, SessionPhase::Holding);

        let input = TickInput {
            set_difficulty: Some(Difficulty::Hard),
            ..Default::default()
        };
        let events = tick(&mut state, &input, 1016.0);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.difficulty, Difficulty::Hard);
        // Cancelled by rebuild, not by explosion
        assert!(events.is_empty());
    }

    #[test]
    fn test_switch_shape_rebuilds_field() {
        let mut state = ReactorState::new(8);
        let before = state.field.positions.clone();
        let input = TickInput {
            set_shape: Some(Shape::Ring),
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);
        assert_eq!(state.shape, Shape::Ring);
        assert_ne!(state.field.positions, before);
    }

    #[test]
    fn test_reselecting_same_difficulty_keeps_session() {
        let mut state = ReactorState::new(9);
        tick(&mut state, &press(), 0.0);
        let input = TickInput {
            set_difficulty: Some(Difficulty::Easy),
            ..Default::default()
        };
        tick(&mut state, &input, 1000.0);
        assert_eq!(state.phase, SessionPhase::Holding);
    }

    #[test]
    fn test_switch_while_completed_keeps_result() {
        let mut state = ReactorState::new(13);
        tick(&mut state, &press(), 0.0);
        tick(&mut state, &TickInput::default(), 3000.0);
        assert_eq!(state.phase, SessionPhase::Completed);

        // A selection change after completion rebuilds the field but leaves
        // the frozen result alone until the player dismisses it
        let input = TickInput {
            set_shape: Some(Shape::Cube),
            ..Default::default()
        };
        tick(&mut state, &input, 3100.0);
        assert_eq!(state.phase, SessionPhase::Completed);
        assert_eq!(state.progress, 100.0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut state = ReactorState::new(10);
        tick(&mut state, &press(), 0.0);
        tick(&mut state, &TickInput::default(), 3000.0);
        assert_eq!(state.phase, SessionPhase::Completed);

        let input = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &input, 4000.0);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_progress_stays_in_range() {
        let mut state = ReactorState::new(12);
        tick(&mut state, &press(), 0.0);
        for f in 0..400 {
            tick(&mut state, &TickInput::default(), f as f64 * FRAME_MS);
            assert!((0.0..=100.0).contains(&state.progress));
        }
    }
}
