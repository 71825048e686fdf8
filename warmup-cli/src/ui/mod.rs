//! Terminal output.

mod progress;

pub use progress::{print_summary, LoadingBar};
