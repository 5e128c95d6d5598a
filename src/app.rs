use crate::compute::NumericMode;
use crate::config::{self, Config};
use crate::event::{Event, EventHandler};
use crate::model::{group_by_assignee, Assignee, CellField, Issue};
use crate::selection::{self, SelectionEvent, SelectionState};
use crate::source::Portfolio;
use crate::ui::components::gate::{Gate, GateEvent};
use crate::ui::{self, HitMap, HitTarget};
use chrono::{Local, NaiveDate};
use color_eyre::Result;
use crossterm::event::{
  DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
  MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::collections::BTreeSet;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

/// Analytic domains the chart popovers can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
  Status,
  StartDate,
  TargetDate,
  DueDate,
  Budget,
  StoryPoints,
  TimeTracking,
  Slippage,
  Dependencies,
  Comments,
}

impl ChartKind {
  pub fn title(&self) -> &'static str {
    match self {
      ChartKind::Status => "Status Overview",
      ChartKind::StartDate => "Start Date Timeline",
      ChartKind::TargetDate => "Target Due Date Tracking",
      ChartKind::DueDate => "Due Date Timeline",
      ChartKind::Budget => "Budget Analysis",
      ChartKind::StoryPoints => "Story Points Analysis",
      ChartKind::TimeTracking => "Time Usage Analysis",
      ChartKind::Slippage => "Date Slippage Analysis",
      ChartKind::Dependencies => "Dependencies Analysis",
      ChartKind::Comments => "Comments Analysis",
    }
  }

  /// View-mode tabs cycled with h/l while the popover is open
  pub fn tab_labels(&self) -> &'static [&'static str] {
    match self {
      ChartKind::StartDate | ChartKind::DueDate => &["Insights", "Timeline"],
      ChartKind::Budget => &["Distribution", "Efficiency"],
      ChartKind::StoryPoints => &["Velocity", "Distribution"],
      ChartKind::TimeTracking => &["Distribution", "Capacity"],
      ChartKind::Slippage => &["Analysis", "Trends"],
      ChartKind::Comments => &["Risks", "Updates", "Questions", "Other"],
      _ => &[],
    }
  }

  pub fn tab_count(&self) -> usize {
    self.tab_labels().len().max(1)
  }
}

/// What a summary field aggregates over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
  Project,
  /// Assignee id
  Assignee(String),
}

/// Identity of one clickable summary field. Clicking the field whose popover
/// is already open closes it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldId {
  pub kind: ChartKind,
  pub scope: Scope,
}

/// The one chart popover that may be open
#[derive(Debug, Clone)]
pub struct PopoverState {
  pub id: FieldId,
  pub anchor: Rect,
  pub tab: usize,
}

/// The floating computation panel
#[derive(Debug, Clone)]
pub struct PanelState {
  pub mode: NumericMode,
}

/// One row of the table body, by identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRef {
  Summary,
  Group(String),
  Issue(String),
}

/// Everything the dashboard screen owns: the issue collection, the selection
/// set, and the single open popover/panel. No other component writes these.
pub struct DashboardState {
  pub issues: Vec<Issue>,
  pub roster: Vec<Arc<Assignee>>,
  pub expanded: BTreeSet<String>,
  pub selection: SelectionState,
  pub panel: Option<PanelState>,
  pub popover: Option<PopoverState>,
  pub focus: usize,
  pub scroll: usize,
  pub today: NaiveDate,
}

impl DashboardState {
  pub fn new(portfolio: Portfolio, today: NaiveDate) -> Self {
    DashboardState {
      issues: portfolio.issues,
      roster: portfolio.roster,
      expanded: BTreeSet::new(),
      selection: SelectionState::default(),
      panel: None,
      popover: None,
      focus: 0,
      scroll: 0,
      today,
    }
  }

  /// Rows of the table body in display order, honoring group expansion
  pub fn body_rows(&self) -> Vec<RowRef> {
    let mut rows = vec![RowRef::Summary];
    for group in group_by_assignee(&self.issues) {
      let id = group.assignee.id.clone();
      let expanded = self.expanded.contains(&id);
      rows.push(RowRef::Group(id));
      if expanded {
        rows.extend(group.issues.iter().map(|i| RowRef::Issue(i.id.clone())));
      }
    }
    rows
  }

  pub fn toggle_expanded(&mut self, assignee_id: &str) {
    if !self.expanded.remove(assignee_id) {
      self.expanded.insert(assignee_id.to_string());
    }
  }

  /// Open the popover for this field, or close it when it is already the
  /// open one. Opening a different field replaces the current popover.
  pub fn toggle_popover(&mut self, id: FieldId, anchor: Rect) {
    match &self.popover {
      Some(open) if open.id == id => self.popover = None,
      _ => self.popover = Some(PopoverState { id, anchor, tab: 0 }),
    }
  }

  pub fn scoped_issues(&self, scope: &Scope) -> Vec<&Issue> {
    match scope {
      Scope::Project => self.issues.iter().collect(),
      Scope::Assignee(id) => self
        .issues
        .iter()
        .filter(|i| i.assignee.id == *id)
        .collect(),
    }
  }

  pub fn scope_label(&self, scope: &Scope) -> String {
    match scope {
      Scope::Project => "Summary".to_string(),
      Scope::Assignee(id) => self
        .roster
        .iter()
        .find(|a| a.id == *id)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| id.clone()),
    }
  }

  /// The calculator affordance shows once a multi-cell selection exists
  pub fn calculator_visible(&self) -> bool {
    self.selection.len() >= 2 && self.selection.anchor().is_some()
  }

  pub fn clear_selection(&mut self) {
    self.selection.clear();
    self.panel = None;
  }

  fn move_focus(&mut self, delta: i32) {
    let rows = self.body_rows().len();
    if rows == 0 {
      return;
    }
    self.focus = (self.focus as i32 + delta).clamp(0, rows as i32 - 1) as usize;
  }

  fn cycle_popover_tab(&mut self, delta: i32) {
    if let Some(popover) = &mut self.popover {
      let tabs = popover.id.kind.tab_count() as i32;
      if tabs > 1 {
        popover.tab = (popover.tab as i32 + delta).rem_euclid(tabs) as usize;
      }
    }
  }
}

/// Which screen is frontmost
pub enum Screen {
  Gate(Gate),
  Dashboard,
}

/// Main application state
pub struct App {
  config: Config,
  pub screen: Screen,
  pub dashboard: DashboardState,
  hits: HitMap,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, portfolio: Portfolio) -> Self {
    let screen = if config::is_authenticated() {
      Screen::Dashboard
    } else {
      Screen::Gate(Gate::new())
    };

    App {
      config,
      screen,
      dashboard: DashboardState::new(portfolio, Local::now().date_naive()),
      hits: HitMap::default(),
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal; mouse capture drives cell selection
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));

    while !self.should_quit {
      terminal.draw(|frame| {
        self.hits = ui::draw(frame, &self.screen, &mut self.dashboard, self.config.title());
      })?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Mouse(mouse) => self.handle_mouse(mouse),
      Event::Tick => {
        // Keep "today" fresh; it is frozen for the span of each draw
        self.dashboard.today = Local::now().date_naive();
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let gate_event = match &mut self.screen {
      Screen::Gate(gate) => gate.handle_key(key),
      Screen::Dashboard => {
        self.handle_dashboard_key(key);
        return;
      }
    };

    if let GateEvent::Submitted(secret) = gate_event {
      if secret == self.config.access.password {
        if self.config.access.remember {
          if let Err(e) = config::remember_authentication() {
            tracing::warn!("failed to persist access flag: {e}");
          }
        }
        self.screen = Screen::Dashboard;
      } else if let Screen::Gate(gate) = &mut self.screen {
        gate.set_error("Incorrect password. Please try again.");
      }
    }
  }

  fn handle_dashboard_key(&mut self, key: KeyEvent) {
    let dash = &mut self.dashboard;
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Esc => {
        // Peel overlays innermost-first, then the selection itself
        if dash.popover.is_some() {
          dash.popover = None;
        } else if dash.panel.is_some() {
          dash.panel = None;
        } else {
          dash.selection.apply(SelectionEvent::ClickOutside);
        }
      }
      KeyCode::Char('j') | KeyCode::Down => dash.move_focus(1),
      KeyCode::Char('k') | KeyCode::Up => dash.move_focus(-1),
      KeyCode::PageDown => dash.move_focus(10),
      KeyCode::PageUp => dash.move_focus(-10),
      KeyCode::Enter => {
        if let Some(RowRef::Group(id)) = dash.body_rows().get(dash.focus).cloned() {
          dash.toggle_expanded(&id);
        }
      }
      KeyCode::Char('c') => {
        if dash.calculator_visible() {
          dash.panel = Some(PanelState {
            mode: NumericMode::Sum,
          });
        }
      }
      KeyCode::Char('m') => {
        if let Some(panel) = &mut dash.panel {
          panel.mode = panel.mode.next();
        }
      }
      KeyCode::Char('x') => dash.clear_selection(),
      KeyCode::Char('h') | KeyCode::Left => dash.cycle_popover_tab(-1),
      KeyCode::Char('l') | KeyCode::Right => dash.cycle_popover_tab(1),
      _ => {}
    }
  }

  fn handle_mouse(&mut self, mouse: MouseEvent) {
    if !matches!(self.screen, Screen::Dashboard) {
      return;
    }
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
      return;
    }

    let hit = self.hits.hit(mouse.column, mouse.row);
    let dash = &mut self.dashboard;

    match hit {
      Some((rect, HitTarget::Cell { issue_id, field })) => {
        Self::handle_cell_click(dash, &issue_id, field, rect, mouse.modifiers);
      }
      Some((rect, HitTarget::Summary { id })) => dash.toggle_popover(id, rect),
      Some((_, HitTarget::GroupToggle { assignee_id })) => dash.toggle_expanded(&assignee_id),
      Some((_, HitTarget::Calculator)) => {
        dash.panel = Some(PanelState {
          mode: NumericMode::Sum,
        });
      }
      // Clicks inside the floating surfaces never clear the selection
      Some((_, HitTarget::Panel)) | Some((_, HitTarget::Popover)) => {}
      None => {
        dash.selection.apply(SelectionEvent::ClickOutside);
        dash.panel = None;
      }
    }
  }

  fn handle_cell_click(
    dash: &mut DashboardState,
    issue_id: &str,
    field: CellField,
    rect: Rect,
    modifiers: KeyModifiers,
  ) {
    let Some(issue) = dash.issues.iter().find(|i| i.id == issue_id) else {
      return;
    };
    let cell = selection::cell_value(issue, field);

    if modifiers.contains(KeyModifiers::SHIFT) {
      let groups = group_by_assignee(&dash.issues);
      let field_order = selection::cells_for_field(&groups, field);
      dash.selection.apply(SelectionEvent::ShiftClick {
        cell,
        rect,
        field_order: &field_order,
      });
    } else if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER) {
      dash.selection.apply(SelectionEvent::CtrlClick { cell });
    } else {
      dash.selection.apply(SelectionEvent::Click { cell, rect });
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::testutil::{assignee, date, issue};

  fn dashboard() -> DashboardState {
    let ada = assignee("a1", "Ada Lovelace");
    let bob = assignee("a2", "Bob Martin");
    let issues = vec![issue("1", &ada), issue("2", &ada), issue("3", &bob)];
    let roster = vec![ada, bob];
    DashboardState::new(Portfolio { issues, roster }, date("2024-03-15"))
  }

  fn field(kind: ChartKind, scope: Scope) -> FieldId {
    FieldId { kind, scope }
  }

  fn anchor() -> Rect {
    Rect::new(40, 6, 12, 1)
  }

  #[test]
  fn test_popover_toggle_is_idempotent() {
    let mut dash = dashboard();
    let budget = field(ChartKind::Budget, Scope::Project);

    dash.toggle_popover(budget.clone(), anchor());
    assert!(dash.popover.is_some());

    // Clicking the same field again closes it
    dash.toggle_popover(budget, anchor());
    assert!(dash.popover.is_none());
  }

  #[test]
  fn test_popover_switch_leaves_exactly_one_open() {
    let mut dash = dashboard();
    dash.toggle_popover(field(ChartKind::Budget, Scope::Project), anchor());
    dash.toggle_popover(
      field(ChartKind::Slippage, Scope::Assignee("a1".into())),
      anchor(),
    );

    let open = dash.popover.as_ref().unwrap();
    assert_eq!(open.id.kind, ChartKind::Slippage);
    assert_eq!(open.id.scope, Scope::Assignee("a1".into()));
  }

  #[test]
  fn test_same_kind_different_scope_is_a_different_field() {
    let mut dash = dashboard();
    dash.toggle_popover(field(ChartKind::Budget, Scope::Project), anchor());
    dash.toggle_popover(
      field(ChartKind::Budget, Scope::Assignee("a1".into())),
      anchor(),
    );
    assert!(dash.popover.is_some());
  }

  #[test]
  fn test_body_rows_follow_expansion() {
    let mut dash = dashboard();
    // Collapsed: summary + two group headers
    assert_eq!(dash.body_rows().len(), 3);

    dash.toggle_expanded("a1");
    let rows = dash.body_rows();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[2], RowRef::Issue("1".into()));
    assert_eq!(rows[3], RowRef::Issue("2".into()));

    dash.toggle_expanded("a1");
    assert_eq!(dash.body_rows().len(), 3);
  }

  #[test]
  fn test_scoped_issues() {
    let dash = dashboard();
    assert_eq!(dash.scoped_issues(&Scope::Project).len(), 3);
    assert_eq!(dash.scoped_issues(&Scope::Assignee("a1".into())).len(), 2);
    assert_eq!(dash.scope_label(&Scope::Assignee("a2".into())), "Bob Martin");
    assert_eq!(dash.scope_label(&Scope::Project), "Summary");
  }

  #[test]
  fn test_clear_selection_closes_panel() {
    let mut dash = dashboard();
    dash.panel = Some(PanelState {
      mode: NumericMode::Sum,
    });
    dash.clear_selection();
    assert!(dash.panel.is_none());
    assert!(dash.selection.is_empty());
  }

  #[test]
  fn test_popover_tab_cycling_wraps() {
    let mut dash = dashboard();
    dash.toggle_popover(field(ChartKind::Comments, Scope::Project), anchor());
    dash.cycle_popover_tab(-1);
    assert_eq!(dash.popover.as_ref().unwrap().tab, 3);
    dash.cycle_popover_tab(1);
    assert_eq!(dash.popover.as_ref().unwrap().tab, 0);

    // Single-view charts stay on their only tab
    dash.popover = None;
    dash.toggle_popover(field(ChartKind::Status, Scope::Project), anchor());
    dash.cycle_popover_tab(1);
    assert_eq!(dash.popover.as_ref().unwrap().tab, 0);
  }
}
