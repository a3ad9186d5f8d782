//! Seeded RNG for goal draws.
//!
//! Every trial draws its incident location from one shared `SmallRng`, in
//! trial order, on the calling thread.  The (trial → goal) mapping is fixed
//! before any search runs, so parallel search execution cannot perturb it.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Deterministic RNG owned by one simulation run.
///
/// Deliberately not `Clone`: two copies would replay the same goal sequence.
pub struct TrialRng(SmallRng);

impl TrialRng {
    pub fn new(seed: u64) -> Self {
        TrialRng(SmallRng::seed_from_u64(seed))
    }

    /// Choose one element uniformly (with replacement across calls).
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
