//! Narrative generation
//!
//! Turns the aggregator's verdict plus the factor analyses into the
//! human-readable summary sentence. Template wording varies per tier; the
//! variant pick is the only non-determinism and is injected via
//! [`TemplateSelector`].

mod generator;
mod templates;

pub use generator::NarrativeGenerator;
pub use templates::{FixedSelector, RandomSelector, TemplateSelector};
