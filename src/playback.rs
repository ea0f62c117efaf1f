//! Playback controller.
//!
//! A synchronous step sequencer wrapping one traversal generator and one
//! accumulation state. The generator itself is pure; the controller owns
//! the progress cursor `t` and is driven by exactly one external loop
//! (typically the UI refresh timer): `tick` consumes a batch of steps per
//! refresh, `single_step` consumes one while paused, `reset` abandons the
//! run. Pacing in wall-clock terms is entirely the caller's business; the
//! engine never blocks and never drops a step.

use std::cmp::min;
use std::fmt;

use ndarray::Array2;

use crate::accumulate::{AccumulationState, Operands, StepUpdate};
use crate::error::{invalid_algorithm_parameter, invalid_state_transition, Result};
use crate::space::Dims;
use crate::traversal::{Algorithm, MacStep, Traversal};

/// Lifecycle of one simulation run.
///
/// `Idle` is initial (and re-entered on `reset`); `Finished` is terminal
/// until `reset`. The legal transitions are enforced by the controller,
/// illegal ones surface as
/// [`TraceError::InvalidStateTransition`](crate::TraceError).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Configured (or empty) and not yet advancing.
    Idle,
    /// Continuously advancing via `tick`.
    Running,
    /// Suspended without losing state.
    Paused,
    /// All `M·N·K` steps consumed.
    Finished,
}

impl PlaybackState {
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Running => "Running",
            PlaybackState::Paused => "Paused",
            PlaybackState::Finished => "Finished",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress snapshot: steps consumed out of the run's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub consumed: usize,
    pub total: usize,
}

impl Progress {
    /// Completion in `[0, 1]`; a run with no configuration reports 0.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.consumed as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.consumed == self.total
    }
}

/// One consumed MAC step and the accumulation delta it produced.
///
/// Emitted for every consumed step, in order, by `single_step`, `tick` and
/// `advance`; no operation silently drops a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    /// Position of this step in the traversal's total order.
    pub index: usize,
    pub step: MacStep,
    pub update: StepUpdate,
}

impl StepEvent {
    /// Human-readable narration for a status line, e.g.
    /// `C[0,1] += A[0,0] * B[0,1]`.
    pub fn narration(&self) -> String {
        self.step.to_string()
    }
}

/// Everything owned by one configured run.
struct Run {
    algorithm: Algorithm,
    dims: Dims,
    operands: Operands,
    traversal: Box<dyn Traversal>,
    accumulation: AccumulationState,
    cursor: usize,
}

impl Run {
    fn consume_one(&mut self) -> StepEvent {
        let step = self.traversal.step_at(self.cursor);
        let update = self.accumulation.apply(step, &self.operands);
        let event = StepEvent {
            index: self.cursor,
            step,
            update,
        };
        self.cursor += 1;
        event
    }

    fn remaining(&self) -> usize {
        self.traversal.total_steps() - self.cursor
    }
}

/// Step sequencer and state machine for one simulation at a time.
///
/// Single-threaded: the controller is owned and driven by one scheduling
/// loop, concurrent calls are not supported. Multiple side-by-side
/// simulations are simply multiple controllers.
pub struct PlaybackController {
    run: Option<Run>,
    state: PlaybackState,
    speed: usize,
}

impl PlaybackController {
    /// An unconfigured controller in `Idle` with speed 1.
    pub fn new() -> Self {
        PlaybackController {
            run: None,
            state: PlaybackState::Idle,
            speed: 1,
        }
    }

    /// Loads a fresh run: validates the operands and the algorithm
    /// configuration, builds the traversal generator, zeroes a new
    /// accumulation state and rewinds to step 0 in `Idle`.
    ///
    /// # Errors
    ///
    /// [`TraceError::InvalidDimension`](crate::TraceError) for malformed
    /// operand shapes, [`TraceError::InvalidAlgorithmParameter`](crate::TraceError)
    /// for bad tile sizes. On error the previous run, if any, is left
    /// untouched.
    pub fn configure(&mut self, algorithm: Algorithm, a: Array2<f32>, b: Array2<f32>) -> Result<()> {
        let operands = Operands::new(a, b)?;
        let dims = operands.dims();
        let traversal = algorithm.build(dims)?;
        let accumulation = AccumulationState::new(dims);

        self.run = Some(Run {
            algorithm,
            dims,
            operands,
            traversal,
            accumulation,
            cursor: 0,
        });
        self.state = PlaybackState::Idle;
        Ok(())
    }

    /// `Idle → Running`.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Idle if self.run.is_some() => {
                self.state = PlaybackState::Running;
                Ok(())
            }
            PlaybackState::Idle => Err(invalid_state_transition(
                "start",
                self.state.name(),
                "no simulation configured",
            )),
            other => Err(invalid_state_transition(
                "start",
                other.name(),
                "start is only valid from Idle",
            )),
        }
    }

    /// `Running → Paused`.
    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Running => {
                self.state = PlaybackState::Paused;
                Ok(())
            }
            other => Err(invalid_state_transition(
                "pause",
                other.name(),
                "pause is only valid while Running",
            )),
        }
    }

    /// `Paused → Running`.
    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Paused => {
                self.state = PlaybackState::Running;
                Ok(())
            }
            other => Err(invalid_state_transition(
                "resume",
                other.name(),
                "resume is only valid while Paused",
            )),
        }
    }

    /// Consumes exactly one step. Valid in `Idle` and `Paused`; the state
    /// is preserved unless the run completes, which transitions to
    /// `Finished`. Disallowed while `Running` to avoid racing the
    /// continuous advance.
    pub fn single_step(&mut self) -> Result<StepEvent> {
        match self.state {
            PlaybackState::Idle | PlaybackState::Paused => {
                let run = self.run.as_mut().ok_or_else(|| {
                    invalid_state_transition("single_step", "Idle", "no simulation configured")
                })?;
                let event = run.consume_one();
                if run.remaining() == 0 {
                    self.state = PlaybackState::Finished;
                }
                Ok(event)
            }
            other => Err(invalid_state_transition(
                "single_step",
                other.name(),
                "single stepping is only valid while Idle or Paused",
            )),
        }
    }

    /// Consumes up to `elapsed_steps` steps. Valid only while `Running`;
    /// clamps at the end of the sequence and transitions to `Finished`
    /// when the last step is consumed. Returns the emitted events in
    /// consumption order.
    pub fn tick(&mut self, elapsed_steps: usize) -> Result<Vec<StepEvent>> {
        if self.state != PlaybackState::Running {
            return Err(invalid_state_transition(
                "tick",
                self.state.name(),
                "tick is only valid while Running",
            ));
        }
        let run = self
            .run
            .as_mut()
            .expect("Running state implies a configured run");

        let count = min(elapsed_steps, run.remaining());
        let mut events = Vec::with_capacity(count);
        for _ in 0..count {
            events.push(run.consume_one());
        }
        if run.remaining() == 0 {
            self.state = PlaybackState::Finished;
        }
        Ok(events)
    }

    /// Consumes one tick's worth of steps at the configured speed.
    pub fn advance(&mut self) -> Result<Vec<StepEvent>> {
        let speed = self.speed;
        self.tick(speed)
    }

    /// Sets the playback speed in steps per `advance` tick.
    ///
    /// # Errors
    ///
    /// Zero is rejected with
    /// [`TraceError::InvalidAlgorithmParameter`](crate::TraceError) rather
    /// than clamped.
    pub fn set_speed(&mut self, steps_per_tick: usize) -> Result<()> {
        if steps_per_tick == 0 {
            return Err(invalid_algorithm_parameter(
                "speed must be at least 1 step per tick",
            ));
        }
        self.speed = steps_per_tick;
        Ok(())
    }

    pub fn speed(&self) -> usize {
        self.speed
    }

    /// Abandons the current run from any state: re-zeroes the accumulation
    /// state, recreates the traversal generator from the current
    /// configuration and rewinds to step 0 in `Idle`.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(run) = self.run.as_mut() {
            run.accumulation.reset();
            run.traversal = run.algorithm.build(run.dims)?;
            run.cursor = 0;
        }
        self.state = PlaybackState::Idle;
        Ok(())
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Steps consumed so far out of the run's total; `0/0` when no run is
    /// configured.
    pub fn progress(&self) -> Progress {
        match &self.run {
            Some(run) => Progress {
                consumed: run.cursor,
                total: run.traversal.total_steps(),
            },
            None => Progress {
                consumed: 0,
                total: 0,
            },
        }
    }

    /// The live accumulation state of the configured run.
    pub fn accumulation(&self) -> Option<&AccumulationState> {
        self.run.as_ref().map(|run| &run.accumulation)
    }

    /// The operands of the configured run.
    pub fn operands(&self) -> Option<&Operands> {
        self.run.as_ref().map(|run| &run.operands)
    }

    pub fn algorithm(&self) -> Option<Algorithm> {
        self.run.as_ref().map(|run| run.algorithm)
    }

    pub fn dims(&self) -> Option<Dims> {
        self.run.as_ref().map(|run| run.dims)
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TraceError;
    use crate::traversal::LoopOrder;
    use ndarray::array;

    fn configured_controller() -> PlaybackController {
        let a = array![[1.0f32, 2.0], [3.0, 4.0]];
        let b = array![[5.0f32, 6.0], [7.0, 8.0]];
        let mut controller = PlaybackController::new();
        controller
            .configure(Algorithm::Naive { order: LoopOrder::Ijk }, a, b)
            .unwrap();
        controller
    }

    #[test]
    fn test_single_step_from_idle_stays_idle() {
        let mut controller = configured_controller();
        assert_eq!(controller.state(), PlaybackState::Idle);

        let event = controller.single_step().unwrap();
        assert_eq!(event.index, 0);
        assert_eq!(controller.progress().consumed, 1);
        // Not Running: single stepping never starts continuous playback.
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_pause_from_idle_fails_and_leaves_state() {
        let mut controller = configured_controller();
        match controller.pause() {
            Err(TraceError::InvalidStateTransition { operation, state, .. }) => {
                assert_eq!(operation, "pause");
                assert_eq!(state, "Idle");
            }
            other => panic!("expected InvalidStateTransition, got {:?}", other.err()),
        }
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(controller.progress().consumed, 0);
    }

    #[test]
    fn test_start_requires_configuration() {
        let mut controller = PlaybackController::new();
        assert!(matches!(
            controller.start(),
            Err(TraceError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_configure_failure_leaves_previous_run() {
        let mut controller = configured_controller();
        controller.single_step().unwrap();

        // M = 0 must fail with InvalidDimension and change nothing.
        let bad_a = Array2::<f32>::zeros((0, 2));
        let bad_b = Array2::<f32>::zeros((2, 2));
        let result = controller.configure(
            Algorithm::Naive { order: LoopOrder::Ijk },
            bad_a,
            bad_b,
        );
        assert!(matches!(result, Err(TraceError::InvalidDimension { .. })));

        assert_eq!(controller.progress().consumed, 1);
        assert_eq!(controller.dims().unwrap().m(), 2);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut controller = configured_controller();

        controller.start().unwrap();
        assert_eq!(controller.state(), PlaybackState::Running);

        let events = controller.tick(3).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(controller.progress().consumed, 3);

        controller.pause().unwrap();
        let event = controller.single_step().unwrap();
        assert_eq!(event.index, 3);

        controller.resume().unwrap();
        // More than remaining: clamps and finishes.
        let events = controller.tick(100).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(controller.state(), PlaybackState::Finished);
        assert!(controller.progress().is_complete());

        // [[1,2],[3,4]] x [[5,6],[7,8]]
        let c = controller.accumulation().unwrap().c();
        assert_eq!(c[[0, 0]], 19.0);
        assert_eq!(c[[0, 1]], 22.0);
        assert_eq!(c[[1, 0]], 43.0);
        assert_eq!(c[[1, 1]], 50.0);
    }

    #[test]
    fn test_single_step_to_completion_finishes() {
        let mut controller = configured_controller();
        for _ in 0..8 {
            controller.single_step().unwrap();
        }
        assert_eq!(controller.state(), PlaybackState::Finished);
        // Terminal until reset.
        assert!(controller.single_step().is_err());
        assert!(controller.start().is_err());
    }

    #[test]
    fn test_single_step_while_running_fails() {
        let mut controller = configured_controller();
        controller.start().unwrap();
        assert!(matches!(
            controller.single_step(),
            Err(TraceError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_tick_requires_running() {
        let mut controller = configured_controller();
        assert!(controller.tick(1).is_err());
        controller.start().unwrap();
        controller.pause().unwrap();
        assert!(controller.tick(1).is_err());
    }

    #[test]
    fn test_events_cover_every_step_in_order() {
        let mut controller = configured_controller();
        let mut indices = Vec::new();

        indices.push(controller.single_step().unwrap().index);
        controller.start().unwrap();
        for event in controller.tick(2).unwrap() {
            indices.push(event.index);
        }
        controller.pause().unwrap();
        indices.push(controller.single_step().unwrap().index);
        controller.resume().unwrap();
        for event in controller.tick(usize::MAX).unwrap() {
            indices.push(event.index);
        }

        assert_eq!(indices, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_speed_and_advance() {
        let mut controller = configured_controller();
        assert_eq!(controller.speed(), 1);

        assert!(matches!(
            controller.set_speed(0),
            Err(TraceError::InvalidAlgorithmParameter { .. })
        ));

        controller.set_speed(3).unwrap();
        controller.start().unwrap();
        assert_eq!(controller.advance().unwrap().len(), 3);
        assert_eq!(controller.advance().unwrap().len(), 3);
        // Clamped final tick.
        assert_eq!(controller.advance().unwrap().len(), 2);
        assert_eq!(controller.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_reset_reproduces_identical_run() {
        let mut controller = configured_controller();

        controller.start().unwrap();
        let first: Vec<_> = controller
            .tick(usize::MAX)
            .unwrap()
            .iter()
            .map(|e| (e.index, e.step, e.update.c_value))
            .collect();
        let first_c = controller.accumulation().unwrap().c().clone();

        controller.reset().unwrap();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(controller.progress().consumed, 0);
        assert!(controller
            .accumulation()
            .unwrap()
            .c()
            .iter()
            .all(|&v| v == 0.0));

        controller.start().unwrap();
        let second: Vec<_> = controller
            .tick(usize::MAX)
            .unwrap()
            .iter()
            .map(|e| (e.index, e.step, e.update.c_value))
            .collect();

        assert_eq!(first, second);
        assert_eq!(&first_c, controller.accumulation().unwrap().c());
    }

    #[test]
    fn test_reset_from_every_state() {
        let mut controller = configured_controller();
        controller.reset().unwrap(); // Idle
        controller.start().unwrap();
        controller.reset().unwrap(); // Running
        assert_eq!(controller.state(), PlaybackState::Idle);

        controller.start().unwrap();
        controller.pause().unwrap();
        controller.reset().unwrap(); // Paused
        assert_eq!(controller.state(), PlaybackState::Idle);

        controller.start().unwrap();
        controller.tick(usize::MAX).unwrap();
        controller.reset().unwrap(); // Finished
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_zero_elapsed_tick_consumes_nothing() {
        let mut controller = configured_controller();
        controller.start().unwrap();
        assert!(controller.tick(0).unwrap().is_empty());
        assert_eq!(controller.state(), PlaybackState::Running);
        assert_eq!(controller.progress().consumed, 0);
    }

    #[test]
    fn test_narration_matches_step() {
        let mut controller = configured_controller();
        let event = controller.single_step().unwrap();
        assert_eq!(event.narration(), "C[0,0] += A[0,0] * B[0,0]");
    }
}
