use std::fmt;
use std::ops::ControlFlow;
use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};
use sm_population::Population;

use crate::Attempt;
use crate::BoundedChannel;
use crate::Channel;
use crate::ChainsAndRings;
use crate::Clock;
use crate::Coagulation;
use crate::Cyclization;
use crate::Fragmentation;
use crate::GaussianChain;
use crate::InverseMass;
use crate::SimulationState;

/// Merging with 1/mi + 1/mj, breaking in detailed balance.
pub type FragmentationSSA =
    ThinningSSA<Population, Coagulation<InverseMass>, Fragmentation<InverseMass>>;

/// Irreversible merging of Gaussian chains that may close into rings.
pub type CyclizationSSA =
    ThinningSSA<ChainsAndRings, Coagulation<GaussianChain>, Cyclization>;

/// Which channel was tried in a step, and how it went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<CA, CB> {
    Forward(Attempt<CA>),
    Backward(Attempt<CB>),
}

impl<CA, CB> Outcome<CA, CB> {
    pub fn is_accepted(&self) -> bool {
        match self {
            Outcome::Forward(a) => a.is_accepted(),
            Outcome::Backward(a) => a.is_accepted(),
        }
    }

    pub fn waiting_time(&self) -> f64 {
        match self {
            Outcome::Forward(a) => a.waiting_time(),
            Outcome::Backward(a) => a.waiting_time(),
        }
    }
}

/// One completed outer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport<CA, CB> {
    /// Zero-based index of this step, counting rejected steps as well.
    pub step: u64,
    /// Elapsed time after this step.
    pub time: f64,
    pub outcome: Outcome<CA, CB>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The clock reached the requested stop time.
    TimeLimit,
    /// The state forbids further steps (e.g. a single chain is left).
    Halted,
    /// Neither channel has anything left to react.
    Exhausted,
    /// The step callback asked to stop.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated(Termination),
}

/// A continuous-time jump process over two competing reaction channels,
/// sampled by thinning against learned rate bounds.
///
/// Each step picks the forward channel with probability
/// `wA bA / (wA bA + wB bB)`, where `w` are the channel weights and `b`
/// the current rate bounds, and lets that channel draw one candidate
/// uniformly. A candidate exceeding the bound raises it and is dropped;
/// otherwise it is accepted with probability propensity / bound. Only
/// accepted events change the state and advance the clock.
pub struct ThinningSSA<S, A, B>
where
    S: SimulationState,
    A: Channel<S>,
    B: Channel<S>,
{
    state: S,
    forward: BoundedChannel<A>,
    backward: BoundedChannel<B>,
    clock: Clock,
    steps: u64,
}

impl<S, A, B> fmt::Debug for ThinningSSA<S, A, B>
where
    S: SimulationState,
    A: Channel<S>,
    B: Channel<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThinningSSA")
            .field("time", &self.clock.elapsed())
            .field("steps", &self.steps)
            .field("n_mol", &self.state.chains().n_mol())
            .field(self.forward.channel().name(), &self.forward.bound())
            .field(self.backward.channel().name(), &self.backward.bound())
            .finish()
    }
}

impl<S, A, B> From<(S, A, B)> for ThinningSSA<S, A, B>
where
    S: SimulationState,
    A: Channel<S>,
    B: Channel<S>,
{
    fn from((state, forward, backward): (S, A, B)) -> Self {
        Self {
            state,
            forward: BoundedChannel::new::<S>(forward),
            backward: BoundedChannel::new::<S>(backward),
            clock: Clock::default(),
            steps: 0,
        }
    }
}

impl<S, A, B> ThinningSSA<S, A, B>
where
    S: SimulationState,
    A: Channel<S>,
    B: Channel<S>,
{
    /// Continue the clock of a previous run. Bounds are re-learned from
    /// their initial estimates.
    pub fn with_start_time(mut self, t_start: f64) -> Self {
        self.clock = Clock::starting_at(t_start);
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    pub fn time(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Number of completed outer steps, including rejections.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn forward(&self) -> &BoundedChannel<A> {
        &self.forward
    }

    pub fn backward(&self) -> &BoundedChannel<B> {
        &self.backward
    }

    /// Current (forward, backward) rate bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.forward.bound(), self.backward.bound())
    }

    /// Probability of trying the forward channel in the next step, or
    /// `None` if neither channel can react.
    pub fn forward_probability(&self) -> Option<f64> {
        let a = self.forward.selection_weight(&self.state);
        let b = self.backward.selection_weight(&self.state);
        let total = a + b;
        if total > 0. && total.is_finite() {
            Some(a / total)
        } else {
            None
        }
    }

    pub fn status(&self, t_max: f64) -> Status {
        if self.clock.elapsed() >= t_max {
            Status::Terminated(Termination::TimeLimit)
        } else if self.state.is_halted() {
            Status::Terminated(Termination::Halted)
        } else if self.forward_probability().is_none() {
            Status::Terminated(Termination::Exhausted)
        } else {
            Status::Running
        }
    }

    /// Perform one outer step. Returns `None` without touching anything
    /// if neither channel can react.
    pub fn step<R>(&mut self, rng: &mut R) -> Option<StepReport<A::Candidate, B::Candidate>>
    where
        R: Rng + ?Sized,
    {
        let p_forward = self.forward_probability()?;
        let outcome = if rng.random::<f64>() < p_forward {
            Outcome::Forward(self.forward.attempt(&mut self.state, rng))
        } else {
            Outcome::Backward(self.backward.attempt(&mut self.state, rng))
        };
        self.clock.advance(outcome.waiting_time());

        let report = StepReport {
            step: self.steps,
            time: self.clock.elapsed(),
            outcome,
        };
        self.steps += 1;
        Some(report)
    }

    /// Step until the clock reaches `t_max` or the run terminates
    /// otherwise. The callback sees every completed step together with
    /// the state after it, and may stop the run by returning
    /// `ControlFlow::Break`. The state is a valid restart point after
    /// any completed step.
    pub fn simulate<R, F>(
        &mut self,
        rng: &mut R,
        t_max: f64,
        mut callback: F,
    ) -> Termination
    where
        R: Rng + ?Sized,
        F: FnMut(&StepReport<A::Candidate, B::Candidate>, &S) -> ControlFlow<()>,
    {
        let termination = loop {
            if let Status::Terminated(reason) = self.status(t_max) {
                break reason;
            }
            let Some(report) = self.step(rng) else {
                break Termination::Exhausted;
            };
            if callback(&report, &self.state).is_break() {
                break Termination::Interrupted;
            }
        };
        debug!("{:?} after {} steps: {:?}", termination, self.steps, self);
        termination
    }
}
