pub mod account;
pub mod chart;
pub mod track;

pub use account::{AuthUser, ListPayload, LoginLog, Profile};
pub use chart::ChartSummary;
pub use track::{RawTrack, Source, Track};

/// Favorites share the track shape; the server keys them by `(id, source)`.
pub type Favorite = Track;
