use tracing::error;

use crate::ui::tui;

/// Restores the terminal and logs the panic before the default hook prints it.
pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = tui::Tui::restore() {
            error!("Failed to restore the terminal: {e}");
        }
        error!("{panic_info}");
        hook(panic_info);
    }));
}
