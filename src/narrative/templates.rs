//! Summary templates and the pluggable variant selector
//!
//! Each overall tier has several wording variants that differ only in flavor,
//! never in selection logic. Variant choice goes through `TemplateSelector`
//! so production can use real randomness while tests force a fixed pick and
//! assert on tier-appropriate content.

use crate::types::OverallTier;

/// Picks one variant index out of `count` candidates.
pub trait TemplateSelector: Send + Sync {
    fn pick(&self, count: usize) -> usize;
}

/// Production selector backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl TemplateSelector for RandomSelector {
    fn pick(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        rand::Rng::gen_range(&mut rand::thread_rng(), 0..count)
    }
}

/// Deterministic selector for tests and reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl TemplateSelector for FixedSelector {
    fn pick(&self, count: usize) -> usize {
        if count == 0 {
            0
        } else {
            self.0 % count
        }
    }
}

/// Flavor suffixes for a dropping tide.
pub const DROPPING_DECOR: [&str; 5] =
    ["dialed!", "money time!", "green light!", "go time!", "optimal!"];

/// Flavor suffixes for a rising tide.
pub const RISING_DECOR: [&str; 5] = [
    "patience pays",
    "almost there",
    "hold tight",
    "wait for it",
    "building up",
];

/// Perfect-timing recommendations on a dropping tide.
pub const PERFECT_TIMING: [&str; 5] = [
    "Perfect timing - conditions are dialed!",
    "Stellar timing - everything aligned!",
    "Money timing - window is open!",
    "Prime conditions - go time!",
    "Perfect window - conditions are firing!",
];

/// Build the wording variants for one tier. `swell`, `wind` and `tide` are
/// the analyzers' descriptive texts; `rec` is the tide timing clause; `ml`
/// the (possibly empty) prediction clause.
pub fn summary_variants(
    tier: OverallTier,
    swell: &str,
    wind: &str,
    tide: &str,
    rec: &str,
    ml: &str,
) -> Vec<String> {
    match tier {
        OverallTier::Firing => vec![
            format!(
                "🔥 FIRING! {swell}, {wind}, {tide}. This is IT - drop everything and surf NOW!{ml}"
            ),
            format!(
                "🚨 BREAKING: Epic conditions! {swell} with {wind} and {tide}. All systems GO!{ml}"
            ),
            format!(
                "⚡ NUCLEAR! {swell}, {wind}, {tide}. The stars have aligned - GO SURF!{ml}"
            ),
        ],
        OverallTier::Epic => vec![
            format!("⚡ Epic session brewing! {swell}, {wind}, {tide}. {rec}{ml}"),
            format!("🏄‍♂️ Premium conditions! {swell} with {wind} and {tide}. {rec}{ml}"),
            format!("🔥 Solid surf alert! {swell}, {wind}, {tide}. {rec}{ml}"),
        ],
        OverallTier::Good => vec![
            format!("👌 Quality waves ahead! {swell}, {wind}, {tide}. {rec}{ml}"),
            format!("🌊 Nice conditions brewing! {swell} meets {wind} with {tide}. {rec}{ml}"),
            format!("🤙 Solid session potential! {swell}, {wind}, {tide}. {rec}{ml}"),
        ],
        OverallTier::Fair => vec![
            format!("🤷‍♂️ Mixed bag today. {swell}, {wind}, {tide}. {rec}{ml}"),
            format!("⚖️ So-so conditions. {swell} with {wind} and {tide}. {rec}{ml}"),
            format!("🌪️ Challenging surf. {swell}, {wind}, {tide}. {rec}{ml}"),
        ],
        OverallTier::Poor => vec![
            format!("😬 Rough conditions. {swell}, {wind}, {tide}. {rec}{ml}"),
            format!(
                "🌊💨 Messy surf today. {swell} with {wind} and {tide}. Better days ahead!{ml}"
            ),
            format!(
                "📚 Study session weather. {swell}, {wind}, {tide}. Time to wax your board!{ml}"
            ),
        ],
        OverallTier::Terrible => vec![
            format!("💀 Gnarly out there! {swell}, {wind}, {tide}. Stay on the beach!{ml}"),
            format!("⚠️ Danger zone! {wind} with {swell} and {tide}. Not surfable!{ml}"),
            format!(
                "🏠 Indoor day! {swell}, {wind}, {tide}. Surf movies and planning time!{ml}"
            ),
        ],
    }
}
