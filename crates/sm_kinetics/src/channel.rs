use std::fmt;
use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::BoundCheck;
use crate::RateBound;

/// One reaction channel of a two-channel thinning simulation on state `S`.
///
/// A channel only describes its reactions. The engine owns the rate
/// bound, the clock and the state, and decides when a channel is tried.
pub trait Channel<S> {
    /// The participants of one proposed reaction.
    type Candidate: Copy + fmt::Debug;

    fn name(&self) -> &'static str;

    /// Size-dependent normalization entering the channel selection
    /// probability together with the channel's rate bound.
    fn weight(&self, state: &S) -> f64;

    fn is_eligible(&self, state: &S) -> bool;

    fn initial_bound(&self) -> f64;

    /// Draws participants uniformly among eligible slots.
    fn draw<R: Rng + ?Sized>(&self, state: &S, rng: &mut R) -> Option<Self::Candidate>;

    /// The true propensity of a drawn candidate.
    fn propensity(&self, state: &S, candidate: &Self::Candidate) -> f64;

    /// Clock increment for accepting `candidate`, evaluated on the state
    /// before the reaction is applied.
    fn waiting_time(&self, state: &S, candidate: &Self::Candidate, propensity: f64) -> f64;

    fn apply(&self, state: &mut S, candidate: &Self::Candidate);
}

/// What happened to the channel chosen in one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attempt<C> {
    /// The channel had no eligible candidates.
    Skipped,
    /// The candidate's propensity exceeded the bound, which was raised.
    BoundRaised { propensity: f64, previous: f64 },
    /// The candidate lost the thinning draw.
    Rejected { candidate: C, propensity: f64 },
    Accepted { candidate: C, propensity: f64, waiting_time: f64 },
}

impl<C> Attempt<C> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Attempt::Accepted { .. })
    }

    pub fn propensity(&self) -> Option<f64> {
        match self {
            Attempt::Skipped => None,
            Attempt::BoundRaised { propensity, .. }
            | Attempt::Rejected { propensity, .. }
            | Attempt::Accepted { propensity, .. } => Some(*propensity),
        }
    }

    pub fn waiting_time(&self) -> f64 {
        match self {
            Attempt::Accepted { waiting_time, .. } => *waiting_time,
            _ => 0.,
        }
    }
}

/// Per-channel bookkeeping of attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub attempts: u64,
    pub skipped: u64,
    pub bound_raises: u64,
    pub rejected: u64,
    pub accepted: u64,
}

impl ChannelStats {
    fn record<C>(&mut self, attempt: &Attempt<C>) {
        self.attempts += 1;
        match attempt {
            Attempt::Skipped => self.skipped += 1,
            Attempt::BoundRaised { .. } => self.bound_raises += 1,
            Attempt::Rejected { .. } => self.rejected += 1,
            Attempt::Accepted { .. } => self.accepted += 1,
        }
    }
}

/// A channel together with its rate bound and statistics.
#[derive(Debug, Clone)]
pub struct BoundedChannel<C> {
    pub(crate) channel: C,
    pub(crate) bound: RateBound,
    pub(crate) stats: ChannelStats,
}

impl<C> BoundedChannel<C> {
    pub fn new<S>(channel: C) -> Self
    where
        C: Channel<S>,
    {
        let bound = RateBound::new(channel.initial_bound());
        Self { channel, bound, stats: ChannelStats::default() }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn bound(&self) -> f64 {
        self.bound.value()
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// Weighted bound of this channel, the unnormalized probability of
    /// trying it in the next step.
    pub(crate) fn selection_weight<S>(&self, state: &S) -> f64
    where
        C: Channel<S>,
    {
        self.channel.weight(state) * self.bound.value()
    }

    /// Draw, bound-check and thin one candidate. On acceptance the state
    /// is mutated, all other outcomes leave it untouched.
    pub(crate) fn attempt<S, R>(&mut self, state: &mut S, rng: &mut R) -> Attempt<C::Candidate>
    where
        C: Channel<S>,
        R: Rng + ?Sized,
    {
        let attempt = self.try_candidate(state, rng);
        self.stats.record(&attempt);
        attempt
    }

    fn try_candidate<S, R>(&mut self, state: &mut S, rng: &mut R) -> Attempt<C::Candidate>
    where
        C: Channel<S>,
        R: Rng + ?Sized,
    {
        if !self.channel.is_eligible(state) {
            return Attempt::Skipped;
        }
        let Some(candidate) = self.channel.draw(state, rng) else {
            return Attempt::Skipped;
        };

        let propensity = self.channel.propensity(state, &candidate);
        if let BoundCheck::Raised { previous } = self.bound.check(propensity) {
            debug!("{} bound raised from {:.6e} to {:.6e} by {:?}",
                self.channel.name(), previous, propensity, candidate);
            return Attempt::BoundRaised { propensity, previous };
        }
        if !self.bound.accepts(propensity, rng) {
            return Attempt::Rejected { candidate, propensity };
        }

        let waiting_time = self.channel.waiting_time(state, &candidate, propensity);
        self.channel.apply(state, &candidate);
        Attempt::Accepted { candidate, propensity, waiting_time }
    }
}
