pub mod account;
pub mod charts;
pub mod favorites;
pub mod lyrics;
pub mod queue;
pub mod search;

pub use account::Account;
pub use charts::Charts;
pub use favorites::Favorites;
pub use lyrics::Lyrics;
pub use queue::Queue;
pub use search::Search;
