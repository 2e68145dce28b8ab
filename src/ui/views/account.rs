use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
};

use crate::{
    event::Event,
    http::PasswordForm,
    model::Profile,
    ui::{
        components::{
            form::{Field, FormInput, FormState, FormWidget},
            spinner::Spinner,
        },
        context::AppContext,
        state::{AppState, PanelState},
        traits::{Action, View},
    },
    util::{colors, page::paginate},
};

pub const LOGS_PAGE_SIZE: usize = 5;

const SIGN_IN_FIELDS: &[Field] = &[Field::text("Username"), Field::secret("Password")];
const PROFILE_FIELDS: &[Field] = &[
    Field::text("Nickname"),
    Field::text("Signature"),
    Field::text("Avatar URL"),
];
const PASSWORD_FIELDS: &[Field] = &[
    Field::secret("Current password"),
    Field::secret("New password"),
    Field::secret("Confirm new password"),
];
const DELETE_FIELDS: &[Field] = &[Field::secret("Password")];

#[derive(Debug, Clone)]
enum Mode {
    SignIn { form: FormState, register: bool },
    Overview,
    EditProfile(FormState),
    ChangePassword(FormState),
    Delete { form: FormState, confirming: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    Info(String),
    Error(String),
}

pub struct Account {
    mode: Mode,
    pending: bool,
    notice: Option<Notice>,
    logs_page: usize,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            mode: Self::sign_in(),
            pending: false,
            notice: None,
            logs_page: 1,
        }
    }
}

impl Account {
    fn sign_in() -> Mode {
        Mode::SignIn {
            form: FormState::new(SIGN_IN_FIELDS),
            register: false,
        }
    }

    /// Follows the session: signed out always shows the sign-in form.
    fn sync_mode(&mut self, signed_in: bool) {
        match (&self.mode, signed_in) {
            (Mode::SignIn { .. }, true) => self.mode = Mode::Overview,
            (Mode::SignIn { .. }, false) => {}
            (_, false) => self.mode = Self::sign_in(),
            _ => {}
        }
    }

    fn notice_line(&self) -> Line<'_> {
        match &self.notice {
            Some(Notice::Info(text)) => Line::styled(text.as_str(), Style::default().fg(colors::ACCENT)),
            Some(Notice::Error(text)) => Line::styled(text.as_str(), Style::default().fg(colors::ERROR)),
            None => Line::default(),
        }
    }

    fn render_sign_in(&self, f: &mut Frame, area: Rect, form: &FormState, register: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(form.height()),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);

        let (title, other) = if register {
            ("Create an account", "sign in")
        } else {
            ("Sign in", "register")
        };
        f.render_widget(
            Paragraph::new(vec![
                Line::styled(title, Style::default().fg(colors::PRIMARY).add_modifier(Modifier::BOLD)),
                Line::styled(
                    format!("Enter submit · Up/Down field · Ctrl-R {other}"),
                    Style::default().fg(colors::NEUTRAL),
                ),
            ]),
            chunks[0],
        );
        f.render_widget(FormWidget::new(form, !self.pending), chunks[1]);

        if self.pending {
            f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label("Please wait..."),
                chunks[2],
            );
        } else {
            f.render_widget(Paragraph::new(self.notice_line()), chunks[2]);
        }
    }

    fn render_overview(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(4),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let user = state.data.user.as_deref().unwrap_or_default();
        let profile_block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Profile · {user}"));
        let profile = match &state.data.profile {
            PanelState::Ready(profile) => {
                let value = |v: &str| {
                    if v.is_empty() {
                        "-".to_string()
                    } else {
                        v.to_string()
                    }
                };
                Paragraph::new(vec![
                    Line::from(format!("Nickname   {}", value(&profile.nickname))),
                    Line::from(format!("Signature  {}", value(&profile.signature))),
                    Line::from(format!("Avatar     {}", value(&profile.avatar_url))),
                ])
            }
            PanelState::Failed(reason) => {
                Paragraph::new(reason.as_str()).style(Style::default().fg(colors::ERROR))
            }
            PanelState::Idle | PanelState::Loading => Paragraph::new("Loading profile..."),
        };
        f.render_widget(profile.block(profile_block).wrap(Wrap { trim: true }), chunks[0]);

        let logs_block = Block::default().borders(Borders::ALL).title("Recent sign-ins");
        match &state.data.logs {
            PanelState::Ready(logs) if logs.is_empty() => {
                f.render_widget(Paragraph::new("No sign-ins recorded").block(logs_block), chunks[1]);
            }
            PanelState::Ready(logs) => {
                let page = paginate(logs.len(), self.logs_page, LOGS_PAGE_SIZE);
                self.logs_page = page.number;
                let rows = page
                    .slice(logs)
                    .iter()
                    .map(|log| Row::new(vec![log.time.clone(), log.device.clone(), log.ip.clone()]));
                let table = Table::new(
                    rows,
                    [
                        Constraint::Length(20),
                        Constraint::Min(10),
                        Constraint::Length(16),
                    ],
                )
                .header(
                    Row::new(vec!["Time", "Device", "IP"])
                        .style(Style::default().fg(colors::PRIMARY)),
                )
                .block(logs_block.title_bottom(format!("Page {}/{}", page.number, page.total)));
                f.render_widget(table, chunks[1]);
            }
            PanelState::Failed(reason) => {
                f.render_widget(
                    Paragraph::new(reason.as_str())
                        .style(Style::default().fg(colors::ERROR))
                        .block(logs_block),
                    chunks[1],
                );
            }
            PanelState::Idle | PanelState::Loading => {
                f.render_widget(Paragraph::new("Loading...").block(logs_block), chunks[1]);
            }
        }

        f.render_widget(Paragraph::new(self.notice_line()), chunks[2]);
        f.render_widget(
            Paragraph::new("e edit profile · c change password · D delete account · o sign out · [ ] logs · r refresh")
                .style(Style::default().fg(colors::NEUTRAL)),
            chunks[3],
        );
    }

    fn render_form(&self, f: &mut Frame, area: Rect, title: &str, form: &FormState, hint: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(form.height()),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);
        f.render_widget(
            Paragraph::new(title).style(Style::default().fg(colors::PRIMARY).add_modifier(Modifier::BOLD)),
            chunks[0],
        );
        f.render_widget(FormWidget::new(form, !self.pending), chunks[1]);
        f.render_widget(Paragraph::new(self.notice_line()), chunks[2]);
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(colors::NEUTRAL)),
            chunks[3],
        );
    }

    fn handle_sign_in(&mut self, key: KeyEvent, ctx: &AppContext) -> Option<Action> {
        let Mode::SignIn { form, register } = &mut self.mode else {
            return None;
        };
        if self.pending {
            return Some(Action::None);
        }
        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            *register = !*register;
            self.notice = None;
            return Some(Action::None);
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match form.handle_key(key) {
            FormInput::Submit => {
                let username = form.value(0).trim().to_string();
                let password = form.value(1).to_string();
                if username.is_empty() || password.is_empty() {
                    self.notice = Some(Notice::Error(
                        "Please enter a username and password".to_string(),
                    ));
                    return Some(Action::None);
                }
                let event = if *register {
                    Event::Register { username, password }
                } else {
                    Event::Login { username, password }
                };
                let _ = ctx.event_tx.send(event);
                self.pending = true;
                self.notice = None;
            }
            FormInput::Cancel => form.clear(),
            FormInput::Edited => {}
        }
        Some(Action::None)
    }

    fn handle_overview(&mut self, key: KeyEvent, state: &AppState, ctx: &AppContext) -> Option<Action> {
        let logs_len = state.data.logs.ready().map_or(0, Vec::len);
        match key.code {
            KeyCode::Char('e') => {
                let profile = state.data.profile.ready().cloned().unwrap_or_default();
                self.mode = Mode::EditProfile(FormState::new(PROFILE_FIELDS).with_values(&[
                    profile.nickname.as_str(),
                    profile.signature.as_str(),
                    profile.avatar_url.as_str(),
                ]));
            }
            KeyCode::Char('c') => self.mode = Mode::ChangePassword(FormState::new(PASSWORD_FIELDS)),
            KeyCode::Char('D') => {
                self.mode = Mode::Delete {
                    form: FormState::new(DELETE_FIELDS),
                    confirming: false,
                }
            }
            KeyCode::Char('o') => {
                let _ = ctx.event_tx.send(Event::Logout);
            }
            KeyCode::Char('r') => {
                let _ = ctx.event_tx.send(Event::RefreshAccount);
            }
            KeyCode::Char('[') => {
                self.logs_page =
                    paginate(logs_len, self.logs_page.saturating_sub(1), LOGS_PAGE_SIZE).number;
            }
            KeyCode::Char(']') => {
                self.logs_page = paginate(logs_len, self.logs_page + 1, LOGS_PAGE_SIZE).number;
            }
            _ => return None,
        }
        self.notice = None;
        Some(Action::None)
    }

    fn handle_form(&mut self, key: KeyEvent, state: &AppState, ctx: &AppContext) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        if self.pending {
            return Some(Action::None);
        }

        match &mut self.mode {
            Mode::EditProfile(form) => match form.handle_key(key) {
                FormInput::Submit => {
                    let profile = Profile {
                        username: state.data.user.clone().unwrap_or_default(),
                        nickname: form.value(0).trim().to_string(),
                        signature: form.value(1).trim().to_string(),
                        avatar_url: form.value(2).trim().to_string(),
                    };
                    let _ = ctx.event_tx.send(Event::SaveProfile(profile));
                    self.pending = true;
                }
                FormInput::Cancel => self.mode = Mode::Overview,
                FormInput::Edited => {}
            },
            Mode::ChangePassword(form) => match form.handle_key(key) {
                FormInput::Submit => {
                    let request = PasswordForm {
                        current: form.value(0).to_string(),
                        new: form.value(1).to_string(),
                        confirm: form.value(2).to_string(),
                    };
                    match request.validate() {
                        Ok(()) => {
                            let _ = ctx.event_tx.send(Event::ChangePassword(request));
                            self.pending = true;
                            self.notice = None;
                        }
                        Err(e) => self.notice = Some(Notice::Error(e.to_string())),
                    }
                }
                FormInput::Cancel => self.mode = Mode::Overview,
                FormInput::Edited => {}
            },
            Mode::Delete { form, confirming } if *confirming => {
                if key.code == KeyCode::Char('y') {
                    let _ = ctx
                        .event_tx
                        .send(Event::DeleteAccount(form.value(0).to_string()));
                    self.pending = true;
                } else {
                    *confirming = false;
                    self.notice = Some(Notice::Info("Deletion cancelled".to_string()));
                }
            }
            Mode::Delete { form, confirming } => match form.handle_key(key) {
                FormInput::Submit => {
                    if form.value(0).is_empty() {
                        self.notice = Some(Notice::Error("Please enter your password".to_string()));
                    } else {
                        *confirming = true;
                        self.notice = None;
                    }
                }
                FormInput::Cancel => self.mode = Mode::Overview,
                FormInput::Edited => {}
            },
            Mode::SignIn { .. } | Mode::Overview => return None,
        }
        Some(Action::None)
    }

    fn finish(&mut self, result: &Result<String, String>) {
        self.pending = false;
        self.notice = Some(match result {
            Ok(message) => Notice::Info(message.clone()),
            Err(reason) => Notice::Error(reason.clone()),
        });
    }
}

#[async_trait]
impl View for Account {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, _ctx: &AppContext) {
        self.sync_mode(state.data.user.is_some());

        let mode = self.mode.clone();
        match &mode {
            Mode::SignIn { form, register } => self.render_sign_in(f, area, form, *register),
            Mode::Overview => self.render_overview(f, area, state),
            Mode::EditProfile(form) => self.render_form(
                f,
                area,
                "Edit profile",
                form,
                "Enter save · Esc cancel",
            ),
            Mode::ChangePassword(form) => self.render_form(
                f,
                area,
                "Change password",
                form,
                "Enter change · Esc cancel",
            ),
            Mode::Delete { form, confirming } => {
                let hint = if *confirming {
                    "This cannot be undone. Press y to delete your account, any other key to cancel"
                } else {
                    "Enter continue · Esc cancel"
                };
                self.render_form(f, area, "Delete account", form, hint);
            }
        }
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        self.sync_mode(state.data.user.is_some());
        match self.mode {
            Mode::SignIn { .. } => self.handle_sign_in(key, ctx),
            Mode::Overview => self.handle_overview(key, state, ctx),
            _ => self.handle_form(key, state, ctx),
        }
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        match event {
            Event::AuthFinished { result, .. } => {
                self.finish(result);
                if result.is_ok() {
                    self.mode = Mode::Overview;
                }
            }
            Event::AccountUpdated { result, .. } => {
                self.finish(result);
                if result.is_ok() {
                    self.mode = Mode::Overview;
                }
            }
            Event::AccountDeleted { result, .. } => {
                self.finish(result);
                if result.is_ok() {
                    self.mode = Self::sign_in();
                }
            }
            Event::LoggedOut => {
                self.pending = false;
                self.mode = Self::sign_in();
                self.notice = Some(Notice::Info("Signed out".to_string()));
            }
            _ => {}
        }
    }
}
