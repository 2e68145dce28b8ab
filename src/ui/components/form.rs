use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::util::colors;

/// A field of a [`FormState`].
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub label: &'static str,
    pub masked: bool,
}

impl Field {
    pub const fn text(label: &'static str) -> Self {
        Self {
            label,
            masked: false,
        }
    }

    pub const fn secret(label: &'static str) -> Self {
        Self {
            label,
            masked: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Edited,
    Submit,
    Cancel,
}

/// Editable values of a stack of single-line fields.
#[derive(Debug, Clone)]
pub struct FormState {
    fields: &'static [Field],
    values: Vec<String>,
    focus: usize,
}

impl FormState {
    pub fn new(fields: &'static [Field]) -> Self {
        Self {
            fields,
            values: vec![String::new(); fields.len()],
            focus: 0,
        }
    }

    pub fn with_values(mut self, values: &[&str]) -> Self {
        for (slot, value) in self.values.iter_mut().zip(values) {
            *slot = value.to_string();
        }
        self
    }

    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(String::clear);
        self.focus = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        let last = self.fields.len().saturating_sub(1);
        match key.code {
            KeyCode::Enter => return FormInput::Submit,
            KeyCode::Esc => return FormInput::Cancel,
            KeyCode::Up => self.focus = self.focus.saturating_sub(1),
            KeyCode::Down => self.focus = (self.focus + 1).min(last),
            KeyCode::Backspace => {
                if let Some(value) = self.values.get_mut(self.focus) {
                    value.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(value) = self.values.get_mut(self.focus) {
                    value.push(c);
                }
            }
            _ => {}
        }
        FormInput::Edited
    }

    pub fn height(&self) -> u16 {
        self.fields.len() as u16 * 3
    }
}

pub struct FormWidget<'a> {
    state: &'a FormState,
    active: bool,
}

impl<'a> FormWidget<'a> {
    pub fn new(state: &'a FormState, active: bool) -> Self {
        Self { state, active }
    }
}

impl Widget for FormWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); self.state.fields.len()])
            .split(area);

        for (i, (field, value)) in self.state.fields.iter().zip(&self.state.values).enumerate() {
            let focused = self.active && i == self.state.focus;
            let border = if focused {
                Style::default().fg(colors::PRIMARY)
            } else {
                Style::default().fg(colors::NEUTRAL)
            };
            let shown = if field.masked {
                "•".repeat(value.chars().count())
            } else {
                value.clone()
            };
            Paragraph::new(shown)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(field.label)
                        .border_style(border),
                )
                .render(rows[i], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[Field] = &[Field::text("User"), Field::secret("Password")];

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = FormState::new(FIELDS);
        form.handle_key(key(KeyCode::Char('a')));
        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Char('x')));
        form.handle_key(key(KeyCode::Char('y')));
        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.value(0), "a");
        assert_eq!(form.value(1), "x");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormInput::Submit);
    }

    #[test]
    fn focus_is_clamped() {
        let mut form = FormState::new(FIELDS);
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.focus(), 0);
        for _ in 0..5 {
            form.handle_key(key(KeyCode::Down));
        }
        assert_eq!(form.focus(), 1);
    }
}
