use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundCheck {
    Within,
    Raised { previous: f64 },
}

/// A maintained upper bound on the per-event propensity of one channel.
///
/// The bound only grows. Every propensity passed to [`RateBound::check`]
/// is at most the bound afterwards, so `propensity / bound` is always a
/// valid acceptance probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBound {
    value: f64,
}

impl RateBound {
    pub fn new(initial: f64) -> Self {
        debug_assert!(initial >= 0. && initial.is_finite(), "invalid initial bound {initial}");
        Self { value: initial }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Raises the bound to `propensity` if it exceeds the current value.
    pub fn check(&mut self, propensity: f64) -> BoundCheck {
        if propensity > self.value {
            let previous = self.value;
            self.value = propensity;
            BoundCheck::Raised { previous }
        } else {
            BoundCheck::Within
        }
    }

    /// Thinning step: accept with probability `propensity / bound`.
    /// Requires a preceding [`RateBound::check`] of the same propensity.
    pub fn accepts<R: Rng + ?Sized>(&self, propensity: f64, rng: &mut R) -> bool {
        debug_assert!(propensity <= self.value);
        rng.random::<f64>() * self.value < propensity
    }
}
