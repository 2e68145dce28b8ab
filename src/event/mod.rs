pub mod events;

pub use events::{Event, Outcome};
