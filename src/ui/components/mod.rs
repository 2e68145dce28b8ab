pub mod controls;
pub mod form;
pub mod gauge;
pub mod lyrics;
pub mod player;
pub mod progress;
pub mod sidebar;
pub mod spectrum;
pub mod spinner;
pub mod track_list;
