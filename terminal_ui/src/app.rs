use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasko_client::alert::AlertSlot;
use tasko_client::form::TaskInput;
use tasko_client::view::{DropTarget, SortKey, ViewConfig};
use tasko_client::{ClientError, StoreSnapshot};
use tasko_shared::{Priority, Task, TaskDraft, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    List,
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: AuthField,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            focus: AuthField::Email,
        }
    }
}

impl AuthForm {
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Signup => &[AuthField::Name, AuthField::Email, AuthField::Password],
        }
    }

    fn step(&mut self, delta: isize) {
        let fields = self.fields();
        let at = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[wrap(at, delta, fields.len())];
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        };
        self.focus = self.fields()[0];
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Name => &mut self.name,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    fn command(&self) -> Command {
        match self.mode {
            AuthMode::Login => Command::Login {
                email: self.email.clone(),
                password: self.password.clone(),
            },
            AuthMode::Signup => Command::Signup {
                name: self.name.clone(),
                email: self.email.clone(),
                password: self.password.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Title,
        FormField::Description,
        FormField::Status,
        FormField::Priority,
        FormField::DueDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Status => "Status",
            FormField::Priority => "Priority",
            FormField::DueDate => "Due date (YYYY-MM-DD)",
        }
    }

    pub fn is_choice(self) -> bool {
        matches!(self, FormField::Status | FormField::Priority)
    }
}

/// The add form, or the edit dialog when `editing` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub input: TaskInput,
    pub focus: FormField,
    pub editing: Option<Task>,
}

impl TaskForm {
    pub fn add() -> Self {
        Self {
            input: TaskInput::blank(),
            focus: FormField::Title,
            editing: None,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            input: TaskInput::from_task(task),
            focus: FormField::Title,
            editing: Some(task.clone()),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.input.title,
            FormField::Description => &self.input.description,
            FormField::Status => &self.input.status,
            FormField::Priority => &self.input.priority,
            FormField::DueDate => &self.input.due_date,
        }
    }

    fn step(&mut self, delta: isize) {
        let at = FormField::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FormField::ALL[wrap(at, delta, FormField::ALL.len())];
    }

    fn cycle_choice(&mut self, delta: isize) {
        match self.focus {
            FormField::Status => {
                let current: TaskStatus = self.input.status.parse().unwrap_or_default();
                let at = TaskStatus::ALL.iter().position(|s| *s == current).unwrap_or(0);
                self.input.status = TaskStatus::ALL[wrap(at, delta, 3)].to_string();
            }
            FormField::Priority => {
                let current: Priority = self.input.priority.parse().unwrap_or_default();
                let at = Priority::ALL.iter().position(|p| *p == current).unwrap_or(0);
                self.input.priority = Priority::ALL[wrap(at, delta, 3)].to_string();
            }
            _ => {}
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.input.title),
            FormField::Description => Some(&mut self.input.description),
            FormField::DueDate => Some(&mut self.input.due_date),
            FormField::Status | FormField::Priority => None,
        }
    }

    fn submit(&self) -> Result<Command, ClientError> {
        let draft = self.input.parse()?;
        Ok(match &self.editing {
            Some(task) => Command::Update(Task::from_draft(task.id.clone(), draft)),
            None => Command::Add(draft),
        })
    }
}

/// A card picked up on the board, and the slot it would land in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carry {
    pub task_id: String,
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Search,
    Form(TaskForm),
    ConfirmDelete { id: String, title: String },
    Carrying(Carry),
}

/// Work for the store, produced by key handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Restore,
    Login { email: String, password: String },
    Signup { name: String, email: String, password: String },
    Logout,
    Refresh,
    Add(TaskDraft),
    Update(Task),
    Delete(String),
    Move { task_id: String, target: DropTarget },
}

impl Command {
    /// Log-safe name; the auth variants carry a password.
    pub fn label(&self) -> &'static str {
        match self {
            Command::Restore => "restore",
            Command::Login { .. } => "login",
            Command::Signup { .. } => "signup",
            Command::Logout => "logout",
            Command::Refresh => "refresh",
            Command::Add(_) => "add",
            Command::Update(_) => "update",
            Command::Delete(_) => "delete",
            Command::Move { .. } => "move",
        }
    }
}

/// What came of a [`Command`], reported back by the store worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    SignedIn,
    /// A task form was accepted by the server.
    Saved(&'static str),
    Done(Option<&'static str>),
    /// A card landed; the cursor follows it.
    Moved(String),
    Failed(String),
    SessionExpired,
}

pub struct App {
    pub screen: Screen,
    pub auth: AuthForm,
    pub tab: Tab,
    pub view: ViewConfig,
    pub mode: Mode,
    pub list_cursor: usize,
    pub board_cursor: (usize, usize),
    pub snapshot: StoreSnapshot,
    pub alerts: AlertSlot,
    pub should_quit: bool,
    focus_task: Option<String>,
}

impl App {
    pub fn new(alert_timeout: Duration) -> Self {
        Self {
            screen: Screen::Login,
            auth: AuthForm::default(),
            tab: Tab::Board,
            view: ViewConfig::default(),
            mode: Mode::Normal,
            list_cursor: 0,
            board_cursor: (0, 0),
            snapshot: StoreSnapshot::default(),
            alerts: AlertSlot::new(alert_timeout),
            should_quit: false,
            focus_task: None,
        }
    }

    /// Takes the latest store state and routes between login and dashboard.
    pub fn sync(&mut self, snapshot: StoreSnapshot) {
        let screen = if snapshot.authenticated {
            Screen::Dashboard
        } else {
            Screen::Login
        };
        if screen != self.screen {
            self.mode = Mode::Normal;
            self.screen = screen;
        }
        self.snapshot = snapshot;

        if let Some(id) = self.focus_task.take() {
            self.focus_on(&id);
        }
        self.clamp_cursors();
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.view.apply(&self.snapshot.tasks)
    }

    pub fn board_columns(&self) -> [Vec<&Task>; 3] {
        self.view.board(&self.snapshot.tasks)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        match self.tab {
            Tab::List => self.visible_tasks().get(self.list_cursor).copied(),
            Tab::Board => {
                let (column, row) = self.board_cursor;
                self.board_columns()[column].get(row).copied()
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match self.screen {
            Screen::Login => self.handle_auth_key(key),
            Screen::Dashboard => match self.mode.clone() {
                Mode::Normal => self.handle_normal_key(key),
                Mode::Search => {
                    self.handle_search_key(key);
                    None
                }
                Mode::Form(form) => self.handle_form_key(form, key),
                Mode::ConfirmDelete { id, .. } => self.handle_confirm_key(id, key),
                Mode::Carrying(carry) => self.handle_carry_key(carry, key),
            },
        }
    }

    /// Reacts to a finished command. Call [`App::sync`] afterwards so the
    /// cursor can follow a moved card.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::SignedIn => self.auth.password.clear(),
            Outcome::Saved(message) => {
                if matches!(self.mode, Mode::Form(_)) {
                    self.mode = Mode::Normal;
                }
                self.alerts.success(message);
            }
            Outcome::Done(message) => {
                if let Some(message) = message {
                    self.alerts.success(message);
                }
            }
            Outcome::Moved(id) => {
                self.focus_task = Some(id);
                self.alerts.success("Task status updated successfully");
            }
            Outcome::Failed(message) => self.alerts.error(message),
            Outcome::SessionExpired => self.alerts.error("Session expired, please log in again"),
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => return Some(self.auth.command()),
            KeyCode::Tab | KeyCode::Down => self.auth.step(1),
            KeyCode::BackTab | KeyCode::Up => self.auth.step(-1),
            KeyCode::F(2) => self.auth.toggle_mode(),
            KeyCode::Backspace => {
                self.auth.focused_mut().pop();
            }
            KeyCode::Char(c) => self.auth.focused_mut().push(c),
            _ => {}
        }
        None
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => {
                self.tab = match self.tab {
                    Tab::List => Tab::Board,
                    Tab::Board => Tab::List,
                }
            }
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('s') => {
                self.view.status = cycle_filter(self.view.status, &TaskStatus::ALL);
                self.clamp_cursors();
            }
            KeyCode::Char('p') => {
                self.view.priority = cycle_filter(self.view.priority, &Priority::ALL);
                self.clamp_cursors();
            }
            KeyCode::Char('x') => {
                self.view = ViewConfig {
                    sort: self.view.sort,
                    ..Default::default()
                };
            }
            KeyCode::Char(c @ '1'..='4') if self.tab == Tab::List => {
                self.view.toggle_sort(SortKey::ALL[c as usize - '1' as usize]);
            }
            KeyCode::Char('a') => self.mode = Mode::Form(TaskForm::add()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::Form(TaskForm::edit(task));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::ConfirmDelete {
                        id: task.id.clone(),
                        title: task.title.clone(),
                    };
                }
            }
            KeyCode::Char(' ') if self.tab == Tab::Board => {
                if let Some(task) = self.selected_task() {
                    let (column, row) = self.board_cursor;
                    self.mode = Mode::Carrying(Carry {
                        task_id: task.id.clone(),
                        column,
                        row,
                    });
                }
            }
            KeyCode::Char('r') => return Some(Command::Refresh),
            KeyCode::Char('L') => return Some(Command::Logout),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Esc => {
                self.view.search.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                self.view.search.pop();
            }
            KeyCode::Char(c) => self.view.search.push(c),
            _ => {}
        }
        self.clamp_cursors();
    }

    fn handle_form_key(&mut self, mut form: TaskForm, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                return None;
            }
            KeyCode::Enter => match form.submit() {
                Ok(command) => return Some(command),
                Err(e) => self.alerts.error(e.to_string()),
            },
            KeyCode::Tab | KeyCode::Down => form.step(1),
            KeyCode::BackTab | KeyCode::Up => form.step(-1),
            KeyCode::Left if form.focus.is_choice() => form.cycle_choice(-1),
            KeyCode::Right | KeyCode::Char(' ') if form.focus.is_choice() => form.cycle_choice(1),
            KeyCode::Backspace => {
                if let Some(text) = form.text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = form.text_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }
        self.mode = Mode::Form(form);
        None
    }

    fn handle_confirm_key(&mut self, id: String, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.mode = Mode::Normal;
                Some(Command::Delete(id))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Normal;
                None
            }
            _ => None,
        }
    }

    fn handle_carry_key(&mut self, mut carry: Carry, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                return None;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.mode = Mode::Normal;
                return self.drop_carried(carry);
            }
            KeyCode::Left | KeyCode::Char('h') => carry.column = carry.column.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => carry.column = (carry.column + 1).min(2),
            KeyCode::Up | KeyCode::Char('k') => carry.row = carry.row.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => carry.row += 1,
            _ => {}
        }
        // One slot past the last card means "end of column".
        let in_column = self.board_columns()[carry.column].len();
        carry.row = carry.row.min(in_column);
        self.mode = Mode::Carrying(carry);
        None
    }

    /// Whether dropping on the hovered card puts the carried one below it.
    /// A card moving toward the end of the collection lands after its target.
    pub fn drop_lands_after(&self, carry: &Carry) -> bool {
        let columns = self.board_columns();
        let Some(over) = columns[carry.column].get(carry.row) else {
            return false;
        };
        let position = |id: &str| self.snapshot.tasks.iter().position(|t| t.id == id);
        matches!(
            (position(&carry.task_id), position(&over.id)),
            (Some(from), Some(to)) if from < to
        )
    }

    fn drop_carried(&self, carry: Carry) -> Option<Command> {
        let columns = self.board_columns();
        let target = match columns[carry.column].get(carry.row) {
            Some(over) if over.id == carry.task_id => return None,
            Some(over) => DropTarget::Task(over.id.clone()),
            None => DropTarget::Column(TaskStatus::ALL[carry.column]),
        };
        Some(Command::Move {
            task_id: carry.task_id,
            target,
        })
    }

    fn move_cursor(&mut self, columns: isize, rows: isize) {
        match self.tab {
            Tab::List => {
                self.list_cursor = self.list_cursor.saturating_add_signed(rows);
            }
            Tab::Board => {
                let (column, row) = self.board_cursor;
                self.board_cursor = (
                    column.saturating_add_signed(columns).min(2),
                    row.saturating_add_signed(rows),
                );
            }
        }
        self.clamp_cursors();
    }

    fn focus_on(&mut self, id: &str) {
        let row = self.visible_tasks().iter().position(|t| t.id == id);
        if let Some(row) = row {
            self.list_cursor = row;
        }

        let spot = self
            .board_columns()
            .iter()
            .enumerate()
            .find_map(|(column, tasks)| tasks.iter().position(|t| t.id == id).map(|row| (column, row)));
        if let Some(spot) = spot {
            self.board_cursor = spot;
        }
    }

    fn clamp_cursors(&mut self) {
        let shown = self.visible_tasks().len();
        self.list_cursor = self.list_cursor.min(shown.saturating_sub(1));

        let (column, row) = self.board_cursor;
        let in_column = self.board_columns()[column].len();
        self.board_cursor = (column, row.min(in_column.saturating_sub(1)));
    }
}

fn wrap(at: usize, delta: isize, len: usize) -> usize {
    (at as isize + delta).rem_euclid(len as isize) as usize
}

/// `None` → first value → … → last value → `None`.
fn cycle_filter<T: Copy + PartialEq>(current: Option<T>, all: &[T]) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => {
            let at = all.iter().position(|v| *v == value)?;
            all.get(at + 1).copied()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tasko_client::alert::AlertKind;
    use tasko_client::view::{SortDirection, SortSpec};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: String::new(),
            status,
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        }
    }

    fn dashboard() -> App {
        let mut app = App::new(Duration::from_secs(15));
        app.sync(StoreSnapshot {
            authenticated: true,
            tasks: vec![
                task("a", TaskStatus::Todo),
                task("b", TaskStatus::Todo),
                task("c", TaskStatus::InProgress),
            ],
            ..Default::default()
        });
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn routes_by_session() {
        let mut app = dashboard();
        assert_eq!(app.screen, Screen::Dashboard);

        app.mode = Mode::Search;
        app.sync(StoreSnapshot::default());
        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn login_form_builds_credentials() {
        let mut app = App::new(Duration::from_secs(15));
        type_text(&mut app, "ana@example.com");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "pw");

        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Some(Command::Login {
                email: "ana@example.com".to_string(),
                password: "pw".to_string()
            })
        );

        app.handle_key(key(KeyCode::F(2)));
        assert_eq!(app.auth.focus, AuthField::Name);
        type_text(&mut app, "Ana");
        assert!(matches!(
            app.handle_key(key(KeyCode::Enter)),
            Some(Command::Signup { name, .. }) if name == "Ana"
        ));
    }

    #[test]
    fn declining_delete_issues_nothing() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Char('d')));
        assert!(matches!(app.mode, Mode::ConfirmDelete { ref id, .. } if id == "a"));

        assert_eq!(app.handle_key(key(KeyCode::Char('n'))), None);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn confirming_delete_issues_one_command() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(
            app.handle_key(key(KeyCode::Char('y'))),
            Some(Command::Delete("b".to_string()))
        );
    }

    #[test]
    fn sort_header_keys_toggle_in_list_view() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::List);

        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(
            app.view.sort,
            Some(SortSpec {
                key: SortKey::Title,
                direction: SortDirection::Descending
            })
        );
        assert_eq!(app.selected_task().unwrap().id, "c");
    }

    #[test]
    fn filter_keys_cycle_through_all() {
        let mut app = dashboard();
        let mut seen = Vec::new();
        for _ in 0..4 {
            app.handle_key(key(KeyCode::Char('s')));
            seen.push(app.view.status);
        }
        assert_eq!(
            seen,
            [
                Some(TaskStatus::Todo),
                Some(TaskStatus::InProgress),
                Some(TaskStatus::Completed),
                None
            ]
        );
    }

    #[test]
    fn carrying_a_card_to_an_empty_column() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));

        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Some(Command::Move {
                task_id: "a".to_string(),
                target: DropTarget::Column(TaskStatus::Completed)
            })
        );
    }

    #[test]
    fn carrying_onto_another_card() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Up));

        assert_eq!(
            app.handle_key(key(KeyCode::Char(' '))),
            Some(Command::Move {
                task_id: "b".to_string(),
                target: DropTarget::Task("c".to_string())
            })
        );
    }

    #[test]
    fn drop_marker_follows_array_move_order() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Down));
        match &app.mode {
            Mode::Carrying(carry) => assert!(app.drop_lands_after(carry)),
            other => panic!("unexpected {other:?}"),
        }

        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Left));
        match &app.mode {
            Mode::Carrying(carry) => {
                assert_eq!((carry.column, carry.row), (0, 0));
                assert!(!app.drop_lands_after(carry));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dropping_where_picked_up_issues_nothing() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn invalid_form_stays_open_with_an_alert() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert!(matches!(app.mode, Mode::Form(_)));
        assert!(app.alerts.visible().is_some());
    }

    #[test]
    fn add_form_submits_a_draft() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "Mow lawn");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "2025-08-09");

        match app.handle_key(key(KeyCode::Enter)) {
            Some(Command::Add(draft)) => {
                assert_eq!(draft.title, "Mow lawn");
                assert_eq!(draft.status, TaskStatus::InProgress);
                assert_eq!(draft.priority, Priority::Low);
                assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 8, 9).unwrap());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn edit_form_keeps_identity() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Char('e')));
        type_text(&mut app, "!");

        match app.handle_key(key(KeyCode::Enter)) {
            Some(Command::Update(task)) => {
                assert_eq!(task.id, "a");
                assert_eq!(task.title, "task a!");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn saved_outcome_closes_the_form() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Char('a')));
        app.apply(Outcome::Done(Some("Tasks refreshed")));
        assert!(matches!(app.mode, Mode::Form(_)));

        app.apply(Outcome::Saved("Task added successfully"));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.alerts.visible().unwrap().message, "Task added successfully");
    }

    #[test]
    fn cursor_follows_a_moved_card() {
        let mut app = dashboard();
        app.apply(Outcome::Moved("a".to_string()));
        app.sync(StoreSnapshot {
            authenticated: true,
            tasks: vec![
                task("b", TaskStatus::Todo),
                task("c", TaskStatus::InProgress),
                task("a", TaskStatus::Completed),
            ],
            ..Default::default()
        });
        assert_eq!(app.board_cursor, (2, 0));
        assert_eq!(app.selected_task().unwrap().id, "a");
    }

    #[test]
    fn failures_become_error_alerts() {
        let mut app = dashboard();
        app.apply(Outcome::Failed("Failed to delete task".to_string()));
        let alert = app.alerts.visible().unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "Failed to delete task");
    }

    #[test]
    fn search_narrows_and_escape_clears() {
        let mut app = dashboard();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "TASK C");
        assert_eq!(app.visible_tasks().len(), 1);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.visible_tasks().len(), 3);
        assert_eq!(app.mode, Mode::Normal);
    }
}
