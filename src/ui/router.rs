use crate::event::Event;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, View};
use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;

/// One live view per sidebar tab plus an optional overlay drawn over the
/// active one. Views keep their state while hidden.
pub struct Router {
    views: Vec<Box<dyn View>>,
    active: usize,
    overlay: Option<Box<dyn View>>,
}

impl Router {
    pub fn new(views: Vec<Box<dyn View>>) -> Self {
        Self {
            views,
            active: 0,
            overlay: None,
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.views.len() {
            self.active = index;
        }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn set_overlay(&mut self, view: Box<dyn View>) {
        self.overlay = Some(view);
    }

    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        if let Some(overlay) = &mut self.overlay {
            overlay.render(f, area, state, ctx);
        } else if let Some(view) = self.views.get_mut(self.active) {
            view.render(f, area, state, ctx);
        }
    }

    pub async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        if let Some(overlay) = &mut self.overlay {
            overlay.handle_input(key, state, ctx).await
        } else if let Some(view) = self.views.get_mut(self.active) {
            view.handle_input(key, state, ctx).await
        } else {
            None
        }
    }

    pub async fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        for view in &mut self.views {
            view.on_event(event, ctx).await;
        }

        if let Some(overlay) = &mut self.overlay {
            overlay.on_event(event, ctx).await;
        }
    }
}
