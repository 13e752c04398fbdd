use serde::Serialize;
use xvol_md::PriceSample;

/// Sign changes of "price above reference" within one session.
///
/// `total_crossings == transitions_down + transitions_up` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrossingResult {
    pub total_crossings: u32,
    /// above -> at-or-below
    pub transitions_down: u32,
    /// at-or-below -> above
    pub transitions_up: u32,
}

impl CrossingResult {
    pub fn new(transitions_down: u32, transitions_up: u32) -> Self {
        Self {
            total_crossings: transitions_down + transitions_up,
            transitions_down,
            transitions_up,
        }
    }
}

/// Counts crossings of `reference` across a time-ordered sample sequence.
///
/// `above = price > reference` (strict: equal counts as not above). The first
/// usable sample only establishes the initial state. Non-finite prices carry
/// no state and are skipped, so a gap never produces or hides a crossing.
/// Empty or single-sample input yields `(0, 0, 0)`.
pub fn count_crossings(prices: &[PriceSample], reference: f64) -> CrossingResult {
    count_crossings_in(prices.iter().map(|s| s.price), reference)
}

/// Same as [`count_crossings`] over bare prices.
pub fn count_crossings_in<I>(prices: I, reference: f64) -> CrossingResult
where
    I: IntoIterator<Item = f64>,
{
    let mut down = 0;
    let mut up = 0;
    let mut prev: Option<bool> = None;

    for above in prices.into_iter().filter(|p| p.is_finite()).map(|p| p > reference) {
        match prev {
            Some(true) if !above => down += 1,
            Some(false) if above => up += 1,
            _ => {}
        }
        prev = Some(above);
    }

    CrossingResult::new(down, up)
}
