//! Interactive terminal console

mod theme;
mod views;
mod widgets;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};
use std::fmt::Display;
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

use vigil_core::{RiskLevel, TargetStatus};
use vigil_modules::{
    realtime_events, templates, zones, EditField, ModuleId, Notice, SurveillanceTab, Tab,
    FACEBOOK_CRITERIA,
};
use vigil_runtime::Console;

use theme::{ACCENT, DIM, KEY};
use widgets::hints;

const EVENT_POLL: Duration = Duration::from_millis(100);

/// Field receiving typed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    SearchQuery,
    ReportsQuery,
    Setting(&'static str),
}

impl TextField {
    fn label(&self) -> &'static str {
        match self {
            TextField::SearchQuery => "Search",
            TextField::ReportsQuery => "Filter reports",
            TextField::Setting(key) => *key,
        }
    }
}

#[derive(Debug)]
struct TextInput {
    field: TextField,
    buffer: String,
}

/// Terminal front-end over a [`Console`]
pub struct App {
    console: Console,
    input: Option<TextInput>,
    criteria_cursor: Option<usize>,
    should_quit: bool,
}

impl App {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            input: None,
            criteria_cursor: None,
            should_quit: false,
        }
    }

    /// Show `result` as a flash message
    fn notify<T, E: Display>(&mut self, result: Result<T, E>, on_ok: impl FnOnce(T) -> Notice) {
        let notice = match result {
            Ok(value) => on_ok(value),
            Err(e) => Notice::error(e.to_string()),
        };
        self.console.set_flash(notice);
    }

    fn open_input(&mut self, field: TextField, buffer: String) {
        self.input = Some(TextInput { field, buffer });
    }

    // ---- input ----

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.console.clear_flash();

        if self.input.is_some() {
            self.handle_text_key(code);
        } else if self.console.new_target_form().is_some() {
            self.handle_new_target_key(code);
        } else if self.console.profiles.pending_delete().is_some() {
            self.handle_delete_confirm(code);
        } else if self.console.settings.pending_reset() {
            self.handle_reset_confirm(code);
        } else if self.console.profiles.edit_form().is_some() {
            self.handle_edit_key(code);
        } else if self.console.reports.is_picking_template() {
            self.handle_template_key(code);
        } else if self.criteria_cursor.is_some() {
            self.handle_criteria_key(code);
        } else {
            self.handle_module_key(code);
        }
    }

    fn handle_text_key(&mut self, code: KeyCode) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Char(c) => input.buffer.push(c),
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    self.commit_text(input);
                }
            }
            _ => {}
        }
    }

    fn commit_text(&mut self, input: TextInput) {
        match input.field {
            TextField::SearchQuery => {
                self.console.search.query = input.buffer;
                self.run_search();
            }
            TextField::ReportsQuery => {
                self.console.reports.query = input.buffer;
                self.console.reports.move_cursor(0);
            }
            TextField::Setting(key) => {
                let result = self.console.settings.settings.set_text(key, &input.buffer);
                if let Err(e) = result {
                    self.console.set_flash(Notice::error(e.to_string()));
                }
            }
        }
    }

    fn handle_new_target_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.console.close_new_target(),
            KeyCode::Enter => {
                let result = self.console.submit_new_target();
                self.notify(result, |t| Notice::success(format!("Target {} created", t.id)));
            }
            _ => {
                if let Some(form) = self.console.new_target_form_mut() {
                    edit_target_fields(code, &mut form.name, &mut form.status, &mut form.risk, &mut form.focus);
                }
            }
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.console.profiles.cancel_edit(),
            KeyCode::Enter => {
                let store = self.console.store().clone();
                let result = self.console.profiles.save_edit(&store);
                self.notify(result, |t| Notice::success(format!("Profile {} updated", t.id)));
            }
            _ => {
                if let Some(form) = self.console.profiles.edit_form_mut() {
                    edit_target_fields(code, &mut form.name, &mut form.status, &mut form.risk, &mut form.focus);
                }
            }
        }
    }

    fn handle_delete_confirm(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y' | 'Y') => {
                let store = self.console.store().clone();
                let result = self.console.profiles.confirm_delete(&store);
                self.notify(result, |t| Notice::info(format!("Profile {} deleted", t.name)));
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => self.console.profiles.cancel_delete(),
            _ => {}
        }
    }

    fn handle_reset_confirm(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y' | 'Y') => {
                if let Some(notice) = self.console.settings.confirm_reset() {
                    self.console.set_flash(notice);
                }
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => self.console.settings.cancel_reset(),
            _ => {}
        }
    }

    fn handle_template_key(&mut self, code: KeyCode) {
        let reports = &mut self.console.reports;
        match code {
            KeyCode::Esc => reports.close_template_picker(),
            KeyCode::Up => reports.move_template_cursor(-1),
            KeyCode::Down => reports.move_template_cursor(1),
            KeyCode::Enter => {
                let template = templates()[reports.template_cursor()].id;
                let result = reports.create_from_template(template);
                self.notify(result, |notice| notice);
            }
            _ => {}
        }
    }

    fn handle_criteria_key(&mut self, code: KeyCode) {
        let Some(cursor) = self.criteria_cursor else {
            return;
        };
        match code {
            KeyCode::Esc | KeyCode::Enter => self.criteria_cursor = None,
            KeyCode::Up => self.criteria_cursor = Some(cursor.saturating_sub(1)),
            KeyCode::Down => {
                self.criteria_cursor = Some((cursor + 1).min(FACEBOOK_CRITERIA.len() - 1));
            }
            KeyCode::Char(' ') => self.console.search.toggle_criterion(cursor),
            _ => {}
        }
    }

    fn handle_module_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(module) = ModuleId::from_hotkey(c) {
                    self.console.navigate(module);
                }
                return;
            }
            _ => {}
        }

        match self.console.active_module() {
            ModuleId::Dashboard => self.dashboard_key(code),
            ModuleId::Search => self.search_key(code),
            ModuleId::Profiles => self.profiles_key(code),
            ModuleId::Analysis => self.analysis_key(code),
            ModuleId::Surveillance => self.surveillance_key(code),
            ModuleId::Reports => self.reports_key(code),
            ModuleId::Settings => self.settings_key(code),
        }
    }

    fn dashboard_key(&mut self, code: KeyCode) {
        let alerts = self.console.alert_count();
        match code {
            KeyCode::Up => self.console.dashboard.move_cursor(-1, alerts),
            KeyCode::Down => self.console.dashboard.move_cursor(1, alerts),
            KeyCode::Char('x') | KeyCode::Delete => {
                let store = self.console.store().clone();
                let result = self.console.dashboard.dismiss_selected(&store);
                self.notify(result, |a| Notice::info(format!("Alert dismissed: {}", a.title)));
            }
            KeyCode::Char('n') => self.console.open_new_target(),
            KeyCode::Char('r') => self.console.open_new_report(),
            KeyCode::Char('s') => self.console.new_search(),
            KeyCode::Char('v') => self.console.active_surveillance(),
            _ => {}
        }
    }

    fn run_search(&mut self) {
        if let Err(e) = self.console.start_search() {
            self.console.set_flash(Notice::warning(e.to_string()));
        }
    }

    fn search_key(&mut self, code: KeyCode) {
        let store = self.console.store().clone();
        match code {
            KeyCode::Char('/') | KeyCode::Char('e') => {
                let query = self.console.search.query.clone();
                self.open_input(TextField::SearchQuery, query);
            }
            KeyCode::Enter => self.run_search(),
            KeyCode::Esc => {
                if self.console.cancel_search() {
                    self.console.set_flash(Notice::info("Search cancelled"));
                }
            }
            KeyCode::Char('f') => self.console.search.source = self.console.search.source.next(),
            KeyCode::Char('k') => self.console.search.kind = self.console.search.kind.next(),
            KeyCode::Char('c') => self.criteria_cursor = Some(0),
            KeyCode::Up => self.console.search.move_cursor(-1),
            KeyCode::Down => self.console.search.move_cursor(1),
            KeyCode::Char('p') => {
                let result = self.console.search.create_profile(&store);
                self.notify(result, |t| Notice::success(format!("Profile {} created", t.id)));
            }
            KeyCode::Char('a') => {
                let result = self.console.search.create_all_profiles(&store);
                self.notify(result, |created| {
                    Notice::success(format!("{} profiles created", created.len()))
                });
            }
            KeyCode::Char('w') => {
                let result = self.console.search.start_surveillance();
                self.notify(result, |notice| notice);
            }
            KeyCode::Char('x') => {
                let result = self.console.search.export_selected(self.console.exporter());
                self.notify(result, |path| Notice::success(format!("Exported to {}", path.display())));
            }
            KeyCode::Char('X') => {
                let result = self.console.search.export_all(self.console.exporter());
                self.notify(result, |path| Notice::success(format!("Exported to {}", path.display())));
            }
            _ => {}
        }
    }

    fn profiles_key(&mut self, code: KeyCode) {
        let store = self.console.store().clone();
        let targets = store.targets();
        let current = self.console.profiles.current(&targets);
        match code {
            KeyCode::Up => self.console.profiles.select_step(&targets, -1),
            KeyCode::Down => self.console.profiles.select_step(&targets, 1),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(target) = current {
                    let result = self.console.profiles.begin_edit(&store, target.id);
                    if let Err(e) = result {
                        self.console.set_flash(Notice::error(e.to_string()));
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(target) = current {
                    self.console.profiles.request_delete(target.id);
                }
            }
            KeyCode::Char('x') => {
                let result = self.console.profiles.export_report(&store, self.console.exporter());
                self.notify(result, |path| Notice::success(format!("Report written to {}", path.display())));
            }
            KeyCode::Char('n') => self.console.open_new_target(),
            _ => {}
        }
    }

    fn analysis_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Right | KeyCode::Tab => self.console.analysis.next_tab(),
            KeyCode::Left | KeyCode::BackTab => self.console.analysis.prev_tab(),
            _ => {}
        }
    }

    fn surveillance_key(&mut self, code: KeyCode) {
        let store = self.console.store().clone();
        let targets = store.targets();
        let sv = &mut self.console.surveillance;
        let len = match sv.tab {
            SurveillanceTab::Realtime => realtime_events(&targets).len(),
            SurveillanceTab::Targets => targets.len(),
            SurveillanceTab::Zones => zones().len(),
        };

        match code {
            KeyCode::Right | KeyCode::Tab => sv.set_tab(sv.tab.next()),
            KeyCode::Left | KeyCode::BackTab => sv.set_tab(sv.tab.prev()),
            KeyCode::Char('o') if sv.tab == SurveillanceTab::Realtime => {
                let Some(event) = realtime_events(&targets).into_iter().nth(sv.cursor()) else {
                    return;
                };
                let result = self.console.open_profile_by_name(&event.target);
                if let Err(e) = result {
                    self.console.set_flash(Notice::warning(e.to_string()));
                }
            }
            KeyCode::Up => sv.move_cursor(-1, len),
            KeyCode::Down => sv.move_cursor(1, len),
            KeyCode::Enter => {
                let cursor = sv.cursor();
                let result = match sv.tab {
                    SurveillanceTab::Realtime => match realtime_events(&targets).get(cursor) {
                        Some(event) => sv.analyze_event(&store, event.id),
                        None => return,
                    },
                    SurveillanceTab::Targets => match sv.active_targets(&targets).get(cursor) {
                        Some(target) => Ok(sv.start_surveillance(target)),
                        None => return,
                    },
                    SurveillanceTab::Zones => match zones().get(cursor) {
                        Some(zone) => sv.manage_zone(zone.id),
                        None => return,
                    },
                };
                self.notify(result, |notice| notice);
            }
            _ => {}
        }
    }

    fn reports_key(&mut self, code: KeyCode) {
        let highlighted = self.console.reports.highlighted().map(|r| r.id);
        match code {
            KeyCode::Char('/') => {
                let query = self.console.reports.query.clone();
                self.open_input(TextField::ReportsQuery, query);
            }
            KeyCode::Char('t') => self.console.reports.cycle_type_filter(),
            KeyCode::Char('d') => {
                self.console.reports.date_range = self.console.reports.date_range.next();
            }
            KeyCode::Up => self.console.reports.move_cursor(-1),
            KeyCode::Down => self.console.reports.move_cursor(1),
            KeyCode::Esc => self.console.reports.close(),
            KeyCode::Char('n') => self.console.reports.open_template_picker(),
            KeyCode::Enter => {
                if let Some(id) = highlighted {
                    let result = self.console.reports.view(id);
                    self.notify(result, |notice| notice);
                }
            }
            KeyCode::Char('x') => {
                if let Some(id) = highlighted {
                    let result = self.console.reports.download(id, self.console.exporter());
                    self.notify(result, |path| Notice::success(format!("Downloaded {}", path.display())));
                }
            }
            KeyCode::Char('s') => {
                if let Some(id) = highlighted {
                    let result = self.console.reports.share_text(id);
                    self.notify(result, |text| Notice::info(text.replace('\n', " - ")));
                }
            }
            _ => {}
        }
    }

    fn settings_key(&mut self, code: KeyCode) {
        let module = &mut self.console.settings;
        match code {
            KeyCode::Right | KeyCode::Tab => module.set_tab(module.tab.next()),
            KeyCode::Left | KeyCode::BackTab => module.set_tab(module.tab.prev()),
            KeyCode::Up => module.move_cursor(-1),
            KeyCode::Down => module.move_cursor(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(field) = module.current_field() else {
                    return;
                };
                if field.value.takes_text() {
                    self.open_input(TextField::Setting(field.key), field.value.display());
                } else {
                    let result = module.settings.toggle(field.key);
                    if let Err(e) = result {
                        self.console.set_flash(Notice::error(e.to_string()));
                    }
                }
            }
            KeyCode::Char('s') => {
                let notice = module.save();
                self.console.set_flash(notice);
            }
            KeyCode::Char('R') => module.request_reset(),
            _ => {}
        }
    }

    // ---- rendering ----

    fn draw(&self, f: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Navigation
                Constraint::Min(0),    // Active module
                Constraint::Length(3), // Status bar
            ])
            .split(f.area());

        self.draw_header(f, outer[0]);
        self.draw_navigation(f, outer[1]);

        let main = outer[2];
        let console = &self.console;
        match console.active_module() {
            ModuleId::Dashboard => views::dashboard(f, main, console),
            ModuleId::Search => views::search(f, main, console, self.criteria_cursor),
            ModuleId::Profiles => views::profiles(f, main, console),
            ModuleId::Analysis => views::analysis(f, main, console),
            ModuleId::Surveillance => views::surveillance(f, main, console),
            ModuleId::Reports => views::reports(f, main, console),
            ModuleId::Settings => views::settings(f, main, console),
        }

        if let Some(form) = console.new_target_form() {
            views::target_form(f, main, "New target", &form.name, form.status, form.risk, form.focus);
        }
        if let Some(input) = &self.input {
            views::text_input(f, main, input.field.label(), &input.buffer);
        }

        self.draw_status(f, outer[3]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let alerts = self.console.alert_count();
        let header = Paragraph::new(Line::from(vec![
            Span::styled("VIGIL", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(" OSINT COMMAND CENTER", Style::default().fg(DIM)),
            Span::raw("    Alerts: "),
            Span::styled(
                alerts.to_string(),
                Style::default().fg(if alerts > 0 { KEY } else { theme::GOOD }),
            ),
            Span::raw("    Targets: "),
            Span::raw(self.console.store().target_count().to_string()),
            Span::raw("    "),
            Span::styled(self.console.clock(), Style::default().fg(ACCENT)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_navigation(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<String> = ModuleId::ALL
            .iter()
            .map(|m| format!("{} {}", m.hotkey(), m.title()))
            .collect();
        let selected = ModuleId::ALL
            .iter()
            .position(|m| *m == self.console.active_module())
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(theme::highlight());
        f.render_widget(tabs, area);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let line = match (&self.input, self.console.flash()) {
            (Some(_), _) => hints(&[("Enter", "Apply"), ("Esc", "Cancel"), ("Backspace", "Delete")]),
            (None, Some(notice)) => Line::from(Span::styled(
                notice.text.clone(),
                Style::default().fg(theme::alert_color(notice.kind)),
            )),
            (None, None) => self.module_hints(),
        };
        f.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn module_hints(&self) -> Line<'static> {
        match self.console.active_module() {
            ModuleId::Dashboard => hints(&[
                ("1-7", "Modules"),
                ("↑↓", "Alerts"),
                ("x", "Dismiss"),
                ("n", "New target"),
                ("r", "New report"),
                ("s", "Search"),
                ("v", "Surveillance"),
                ("q", "Quit"),
            ]),
            ModuleId::Search => hints(&[
                ("/", "Query"),
                ("Enter", "Search"),
                ("Esc", "Cancel"),
                ("f", "Source"),
                ("k", "Type"),
                ("c", "Criteria"),
                ("p/a", "Profile one/all"),
                ("x/X", "Export one/all"),
                ("w", "Watch"),
            ]),
            ModuleId::Profiles => hints(&[
                ("↑↓", "Select"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("x", "Export report"),
                ("n", "New target"),
                ("q", "Quit"),
            ]),
            ModuleId::Analysis => hints(&[("←→", "Views"), ("1-7", "Modules"), ("q", "Quit")]),
            ModuleId::Surveillance => hints(&[
                ("←→", "Views"),
                ("↑↓", "Select"),
                ("Enter", "Analyze / watch / manage"),
                ("o", "Open profile"),
                ("q", "Quit"),
            ]),
            ModuleId::Reports => hints(&[
                ("/", "Filter"),
                ("t", "Type"),
                ("d", "Range"),
                ("Enter", "Open"),
                ("x", "Download"),
                ("s", "Share"),
                ("n", "New report"),
            ]),
            ModuleId::Settings => hints(&[
                ("←→", "Tabs"),
                ("↑↓", "Select"),
                ("Space", "Change"),
                ("s", "Save"),
                ("R", "Reset"),
                ("q", "Quit"),
            ]),
        }
    }
}

/// Keys shared by the new-target and edit forms
fn edit_target_fields(
    code: KeyCode,
    name: &mut String,
    status: &mut TargetStatus,
    risk: &mut RiskLevel,
    focus: &mut EditField,
) {
    match (code, *focus) {
        (KeyCode::Tab, _) | (KeyCode::Down, _) => *focus = focus.next(),
        (KeyCode::Backspace, EditField::Name) => {
            name.pop();
        }
        (KeyCode::Char(c), EditField::Name) => name.push(c),
        (KeyCode::Char(' ') | KeyCode::Right, EditField::Status) => *status = status.next(),
        (KeyCode::Char(' ') | KeyCode::Right, EditField::Risk) => *risk = risk.next(),
        _ => {}
    }
}

/// Run the console until the user quits
pub async fn run_tui(console: Console) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(console);
    info!("Dashboard started");

    let result = loop {
        app.console.pump();
        app.console.tick_if_due(Instant::now());

        if let Err(e) = terminal.draw(|f| app.draw(f)) {
            break Err(e.into());
        }

        match event::poll(EVENT_POLL) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key.code, key.modifiers);
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }

        if app.should_quit {
            break Ok(());
        }

        // let spawned searches make progress between frames
        tokio::task::yield_now().await;
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("Dashboard closed");
    result
}
