//! Collapsible sections: the one-shot restructuring pass and the toggle
//! controller bound to its output.

mod restructure;
mod toggle;
mod tree;

pub use restructure::{RestructureSummary, restructure};
pub use toggle::{FixedHeight, LayoutMetrics, ToggleController, ToggleState};
pub use tree::{NodeKind, SectionTree};
