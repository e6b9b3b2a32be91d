//! Page sorter: keep healthy pages, discard the rest before the clock runs out

pub mod page;
pub mod state;
pub mod tick;

pub use page::{Page, PageState, Quality, Verdict};
pub use state::{SorterPhase, SorterState};
pub use tick::{SorterInput, tick};
