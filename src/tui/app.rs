//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the `TaskStore`,
//! handles user input, renders the interface, and coordinates between the
//! screens (task list, edit modal, detail view, dialogs).

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::fields::*;
use crate::store::{StoreError, TaskStore};
use crate::task::TaskId;
use crate::tui::{
    colors::{ACCENT_BLUE, DANGER_RED, MUTED_GREY, SAVE_GREEN},
    enums::{Alert, AppState, DetailParams, Focus},
    input::InputField,
    task_form::{TaskForm, DESCRIPTION_FIELD, TITLE_FIELD},
    utils::centered_rect,
};

/// State snapshot for navigation history.
#[derive(Clone)]
struct NavigationSnapshot {
    state: AppState,
    detail: Option<DetailParams>,
}

/// Main application state for the terminal user interface.
///
/// The store (tasks plus the edit draft) lives here and is only changed
/// through its own operations; render functions read it by reference.
pub struct App {
    state: AppState,
    store: TaskStore,
    task_list_state: TableState,
    focus: Focus,
    add_form: TaskForm,
    edit_form: TaskForm,
    detail: Option<DetailParams>,
    pending_delete: Option<TaskId>,
    alert: Option<Alert>,
    status_message: String,
    navigation_history: Vec<NavigationSnapshot>,
    max_history: usize,
    poll_timeout: Duration,
}

impl App {
    /// Create a new App around a store.
    pub fn new(store: TaskStore, poll_timeout: Duration) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            store,
            task_list_state: TableState::default(),
            focus: Focus::List,
            add_form: TaskForm::new(),
            edit_form: TaskForm::new(),
            detail: None,
            pending_delete: None,
            alert: None,
            status_message: String::new(),
            navigation_history: Vec::new(),
            max_history: 10,
            poll_timeout,
        };
        app.sync_selection();
        app
    }

    /// Push current state to navigation history and transition to new state.
    fn push_state(&mut self, new_state: AppState) {
        let snapshot = NavigationSnapshot {
            state: self.state,
            detail: self.detail.clone(),
        };
        self.navigation_history.push(snapshot);
        if self.navigation_history.len() > self.max_history {
            self.navigation_history.remove(0);
        }
        self.state = new_state;
        self.status_message.clear();
    }

    /// Go back to the previous state, or to the task list when there is none.
    fn go_back(&mut self) {
        match self.navigation_history.pop() {
            Some(snapshot) => {
                self.state = snapshot.state;
                self.detail = snapshot.detail;
            }
            None => {
                self.state = AppState::TaskList;
                self.detail = None;
            }
        }
        self.status_message.clear();
    }

    /// Keep the table selection pointing at a row that exists.
    fn sync_selection(&mut self) {
        let len = self.store.len();
        let selected = match self.task_list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.task_list_state.select(selected);
    }

    /// Id of the highlighted row.
    fn selected_id(&self) -> Option<TaskId> {
        self.task_list_state
            .selected()
            .and_then(|i| self.store.tasks().get(i))
            .map(|t| t.id)
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Show a store error as a blocking notification.
    fn show_alert(&mut self, err: &StoreError) {
        self.alert = Some(Alert {
            heading: err.heading().to_string(),
            message: err.to_string(),
        });
        self.push_state(AppState::Alert);
    }

    fn add_task(&mut self) {
        let result = self
            .store
            .add(&self.add_form.title.value, &self.add_form.description.value)
            .map(|tasks| tasks.len());
        match result {
            Ok(len) => {
                self.add_form.clear();
                self.task_list_state.select(Some(len - 1));
                self.set_status_message("Task added");
            }
            Err(e) => self.show_alert(&e),
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle_status(id);
            if let Some(task) = self.store.get(id) {
                let msg = format!("Task #{} marked {}", id, format_status(task.status));
                self.set_status_message(msg);
            }
        }
    }

    fn edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.begin_edit(id) {
            Ok(draft) => {
                self.edit_form = TaskForm::from_draft(draft);
                self.push_state(AppState::EditTask);
            }
            Err(e) => self.show_alert(&e),
        }
    }

    fn save_edit(&mut self) {
        let result = self
            .store
            .commit_edit(&self.edit_form.title.value, &self.edit_form.description.value)
            .map(|_| ());
        match result {
            Ok(()) => {
                self.go_back();
                self.set_status_message("Task updated");
            }
            Err(e) => {
                if self.store.draft().is_none() {
                    self.go_back();
                    self.sync_selection();
                }
                self.show_alert(&e);
            }
        }
    }

    fn cancel_edit(&mut self) {
        self.store.cancel_edit();
        self.go_back();
        self.set_status_message("Edit cancelled");
    }

    fn open_detail(&mut self) {
        let params = self
            .selected_id()
            .and_then(|id| self.store.get(id))
            .map(DetailParams::from_task);
        if let Some(params) = params {
            self.push_state(AppState::TaskDetail);
            self.detail = Some(params);
        }
    }

    fn ask_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            self.pending_delete = Some(id);
            self.push_state(AppState::Confirm);
        }
    }

    /// Route text-editing keys to an input. Returns false when the key isn't an edit key.
    fn edit_input(field: &mut InputField, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => field.handle_char(c),
            KeyCode::Backspace => field.handle_backspace(),
            KeyCode::Delete => field.handle_delete(),
            KeyCode::Left => field.move_cursor_left(),
            KeyCode::Right => field.move_cursor_right(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            _ => return false,
        }
        true
    }

    /// Handle keyboard input on the list screen.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return false;
            }
            _ => {}
        }

        if self.focus != Focus::List {
            self.add_form.current_field = if self.focus == Focus::Title {
                TITLE_FIELD
            } else {
                DESCRIPTION_FIELD
            };
            match key {
                KeyCode::Enter => self.add_task(),
                KeyCode::Esc => self.focus = Focus::List,
                KeyCode::Down if self.focus == Focus::Title => self.focus = Focus::Description,
                KeyCode::Up if self.focus == Focus::Description => self.focus = Focus::Title,
                _ => {
                    Self::edit_input(self.add_form.active_mut(), key, modifiers);
                }
            }
            return false;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if let Some(selected) = self.task_list_state.selected() {
                    self.task_list_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.store.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Home => self.sync_selection_to(0),
            KeyCode::End => self.sync_selection_to(self.store.len().saturating_sub(1)),
            KeyCode::Enter => self.open_detail(),
            KeyCode::Char(' ') | KeyCode::Char('c') => self.toggle_selected(),
            KeyCode::Char('e') => self.edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.ask_delete(),
            KeyCode::Char('a') | KeyCode::Char('i') => self.focus = Focus::Title,
            KeyCode::Char('h') | KeyCode::Char('?') => self.push_state(AppState::Help),
            _ => {}
        }
        false
    }

    fn sync_selection_to(&mut self, index: usize) {
        if !self.store.is_empty() {
            self.task_list_state.select(Some(index));
        }
    }

    /// Handle keyboard input in the edit modal.
    fn handle_edit_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter => self.save_edit(),
            KeyCode::Tab | KeyCode::Down => self.edit_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.edit_form.prev_field(),
            _ => {
                Self::edit_input(self.edit_form.active_mut(), key, modifiers);
            }
        }
    }

    /// Handle keyboard input on the read-only detail screen.
    fn handle_detail_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') | KeyCode::Char('q')) {
            self.go_back();
        }
    }

    /// Handle keyboard input in the delete confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.go_back();
                if let Some(id) = self.pending_delete.take() {
                    self.store.remove(id);
                    self.sync_selection();
                    self.set_status_message(format!("Deleted task #{}", id));
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.go_back();
            }
            _ => {}
        }
    }

    fn handle_alert_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            self.alert = None;
            self.go_back();
        }
    }

    fn handle_help_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')) {
            self.go_back();
        }
    }

    /// Dispatch a key press to the handler for the current screen.
    ///
    /// Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.status_message.clear();

        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key, modifiers),
            AppState::EditTask => self.handle_edit_input(key, modifiers),
            AppState::TaskDetail => self.handle_detail_input(key),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::Alert => self.handle_alert_input(key),
            AppState::Help => self.handle_help_input(key),
        }
        false
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(self.poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    /// Render a single-line input inside a bordered block.
    fn render_input(f: &mut Frame, area: Rect, title: &str, field: &InputField, focused: bool) {
        let border_style = if focused {
            Style::default().fg(ACCENT_BLUE)
        } else {
            Style::default()
        };
        let input = Paragraph::new(field.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(border_style),
        );
        f.render_widget(input, area);

        if focused {
            let max_x = area.width.saturating_sub(2);
            let x = (field.cursor as u16).min(max_x);
            f.set_cursor_position((area.x + 1 + x, area.y + 1));
        }
    }

    /// Render the list screen: header, add form and the task table.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect, interactive: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Add form
                Constraint::Min(0),    // Table
            ])
            .split(area);

        let header = Paragraph::new(Line::from(Span::styled(
            "My Personal Tasks",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let form_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(45),
                Constraint::Percentage(20),
            ])
            .split(chunks[1]);

        Self::render_input(
            f,
            form_chunks[0],
            "Task Title",
            &self.add_form.title,
            interactive && self.focus == Focus::Title,
        );
        Self::render_input(
            f,
            form_chunks[1],
            "Task Description",
            &self.add_form.description,
            interactive && self.focus == Focus::Description,
        );
        let button = Paragraph::new("Add Task (Enter)")
            .style(Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(button, form_chunks[2]);

        let list_style = if self.focus == Focus::List {
            Style::default().fg(ACCENT_BLUE)
        } else {
            Style::default()
        };
        let list_block = Block::default()
            .borders(Borders::ALL)
            .border_style(list_style)
            .title(format!("Tasks ({}) - Press 'h' for help", self.store.len()));

        if self.store.is_empty() {
            let empty = Paragraph::new("No tasks yet. Press 'a' to add one.")
                .block(list_block)
                .alignment(Alignment::Center);
            f.render_widget(empty, chunks[2]);
            return;
        }

        let header_cells = ["ID", "Title", "Description", "Status"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(ACCENT_BLUE).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .store
            .tasks()
            .iter()
            .map(|task| {
                let title_style = if task.status.is_completed() {
                    Style::default().fg(MUTED_GREY).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(Span::styled(task.title.clone(), title_style)),
                    Cell::from(task.description.lines().next().unwrap_or("").to_string()),
                    Cell::from(Span::styled(
                        format_status(task.status),
                        Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
                    )),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),      // ID
            Constraint::Percentage(35), // Title
            Constraint::Min(20),        // Description
            Constraint::Length(10),     // Status
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(list_block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[2], &mut self.task_list_state);
    }

    /// Render the read-only detail screen from its navigation parameters.
    fn render_task_detail(&mut self, f: &mut Frame, area: Rect) {
        let Some(params) = &self.detail else {
            return;
        };
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let text = vec![
            Line::from(Span::styled(params.title.as_str(), bold)),
            Line::from(""),
            Line::from(if params.description.is_empty() {
                "-"
            } else {
                params.description.as_str()
            }),
            Line::from(""),
            Line::from(vec![
                Span::styled("Status: ", bold),
                Span::styled(
                    format_status(params.status()),
                    Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![Span::styled("ID: ", bold), Span::raw(params.id.as_str())]),
            Line::from(vec![Span::styled("Created: ", bold), Span::raw(params.created.as_str())]),
            Line::from(""),
            Line::from(Span::styled("[Esc] Go Back", Style::default().fg(ACCENT_BLUE))),
        ];

        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Task Details"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the edit modal over the list.
    fn render_edit_modal(&mut self, f: &mut Frame, area: Rect, interactive: bool) {
        let area = centered_rect(60, 50, area);
        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Edit Task")
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(1), // Buttons
                Constraint::Min(0),
            ])
            .split(inner);

        Self::render_input(
            f,
            chunks[0],
            "Task Title",
            &self.edit_form.title,
            interactive && self.edit_form.current_field == TITLE_FIELD,
        );
        Self::render_input(
            f,
            chunks[1],
            "Task Description",
            &self.edit_form.description,
            interactive && self.edit_form.current_field == DESCRIPTION_FIELD,
        );

        let buttons = Paragraph::new(Line::from(vec![
            Span::styled("[Esc] Cancel", Style::default().fg(MUTED_GREY)),
            Span::raw("    "),
            Span::styled("[Enter] Save", Style::default().fg(SAVE_GREEN).add_modifier(Modifier::BOLD)),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(buttons, chunks[2]);
    }

    /// Render the delete confirmation dialog.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Delete Task")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DANGER_RED));

        let area = centered_rect(50, 40, area);
        f.render_widget(Clear, area);

        let title = self
            .pending_delete
            .and_then(|id| self.store.get(id))
            .map(|t| format!("#{} {}", t.id, t.title))
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(title),
            Line::from(""),
            Line::from(vec![
                Span::styled("'y' Delete", Style::default().fg(DANGER_RED).add_modifier(Modifier::BOLD)),
                Span::raw("    "),
                Span::raw("'n' Cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the blocking error notification.
    fn render_alert(&mut self, f: &mut Frame, area: Rect) {
        let Some(alert) = &self.alert else {
            return;
        };
        let area = centered_rect(50, 40, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(alert.message.as_str()),
            Line::from(""),
            Line::from(Span::styled("Press Enter to dismiss", Style::default().fg(MUTED_GREY))),
        ];
        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(alert.heading.as_str())
                    .border_style(Style::default().fg(DANGER_RED)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![Span::styled(format!("{:<16}", keys), bold), Span::raw(what)])
        };
        let text = vec![
            Line::from(Span::styled("Task list", bold.fg(ACCENT_BLUE))),
            entry("Tab / Shift-Tab", "Switch between title, description and list"),
            entry("a", "Start typing a new task"),
            entry("Enter", "Add task (in the form) / open details (in the list)"),
            entry("Up / Down", "Select task"),
            entry("Space / c", "Toggle pending / completed"),
            entry("e", "Edit task"),
            entry("d", "Delete task"),
            entry("q / Esc", "Quit"),
            Line::from(""),
            Line::from(Span::styled("Edit task", bold.fg(ACCENT_BLUE))),
            entry("Tab", "Next field"),
            entry("Enter", "Save"),
            entry("Esc", "Cancel"),
            Line::from(""),
            Line::from(Span::styled("Task details", bold.fg(ACCENT_BLUE))),
            entry("Esc / b", "Go back"),
            Line::from(""),
            entry("Ctrl-C", "Quit from anywhere"),
        ];
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help - [Esc] back"));
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => {
                    let (pending, completed) = self.store.counts();
                    format!(
                        "{} pending, {} completed | Tab: switch focus | h: help",
                        pending, completed
                    )
                }
                AppState::TaskDetail => "Task Details".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
                AppState::Alert => "Notice".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(ACCENT_BLUE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// The screen shown underneath an overlay.
    fn underlying_state(&self) -> AppState {
        self.navigation_history
            .last()
            .map_or(AppState::TaskList, |s| s.state)
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0], true),
            AppState::TaskDetail => self.render_task_detail(f, chunks[0]),
            AppState::EditTask => {
                self.render_task_list(f, chunks[0], false);
                self.render_edit_modal(f, chunks[0], true);
            }
            AppState::Confirm => {
                self.render_task_list(f, chunks[0], false);
                self.render_confirm(f, chunks[0]);
            }
            AppState::Alert => {
                self.render_task_list(f, chunks[0], false);
                if self.underlying_state() == AppState::EditTask {
                    self.render_edit_modal(f, chunks[0], false);
                }
                self.render_alert(f, chunks[0]);
            }
            AppState::Help => self.render_help(f, chunks[0]),
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        tracing::info!(tasks = self.store.len(), "ui closed");
        Ok(())
    }
}
