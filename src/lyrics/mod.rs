pub mod parser;
pub mod sync;

pub use parser::{LyricLine, NO_LYRICS, parse};
pub use sync::LyricsSync;
