//! Per-module screens

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Cell, List, ListItem, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use vigil_core::{RiskLevel, TargetStatus};
use vigil_modules::{
    activity_series, influential_nodes, live_risk_breakdown, metrics, network_summary,
    profile_cards, realtime_events, recent_targets, risk_distribution, source_distribution,
    system_status, templates, trend_series, weak_signals, zones, AnalysisTab, EditField,
    ProfileDetail, SettingsTab, SurveillanceTab, Tab, FACEBOOK_CRITERIA, SEARCH_TIPS,
};
use vigil_runtime::Console;

use super::theme::{self, ACCENT, BAD, DIM, GOOD, KEY, TEXT};
use super::widgets::{centered_rect, field_line, panel, popup, tab_strip};

fn split(direction: Direction, area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    Layout::default()
        .direction(direction)
        .constraints(constraints.to_vec())
        .split(area)
        .to_vec()
}

fn selection(cursor: usize, len: usize) -> TableState {
    TableState::default().with_selected((len > 0).then_some(cursor.min(len - 1)))
}

fn risk_cell(risk: RiskLevel) -> Cell<'static> {
    Cell::from(risk.label()).style(Style::default().fg(theme::risk_color(risk)))
}

fn status_cell(status: TargetStatus) -> Cell<'static> {
    Cell::from(status.label()).style(Style::default().fg(theme::status_color(status)))
}

fn priority_cell(priority: &'static str) -> Cell<'static> {
    Cell::from(priority).style(Style::default().fg(theme::priority_color(priority)))
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.to_vec()).style(Style::default().fg(DIM).add_modifier(Modifier::BOLD))
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)))
}

// ---- dashboard ----

pub fn dashboard(f: &mut Frame, area: Rect, c: &Console) {
    let rows = split(
        Direction::Vertical,
        area,
        &[Constraint::Length(4), Constraint::Min(8), Constraint::Length(8)],
    );

    let cards = split(Direction::Horizontal, rows[0], &[Constraint::Ratio(1, 4); 4]);
    for (metric, slot) in metrics().iter().zip(cards.iter()) {
        let change = if metric.is_increase() { GOOD } else { BAD };
        let line = Line::from(vec![
            Span::styled(metric.value, Style::default().fg(TEXT).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(metric.change, Style::default().fg(change)),
        ]);
        f.render_widget(Paragraph::new(line).block(panel(metric.title)), *slot);
    }

    let middle = split(
        Direction::Horizontal,
        rows[1],
        &[Constraint::Percentage(55), Constraint::Percentage(45)],
    );

    let now = Utc::now();
    let alerts = c.store().alerts();
    let alert_rows: Vec<Row> = alerts
        .iter()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.kind.label()).style(Style::default().fg(theme::alert_color(a.kind))),
                Cell::from(a.title.clone()),
                Cell::from(a.message.clone()),
                Cell::from(a.age_label(now)),
            ])
        })
        .collect();
    let table = Table::new(
        alert_rows,
        [
            Constraint::Length(8),
            Constraint::Length(20),
            Constraint::Min(20),
            Constraint::Length(10),
        ],
    )
    .block(panel(format!("Alerts ({})", alerts.len())))
    .row_highlight_style(theme::highlight());
    f.render_stateful_widget(table, middle[0], &mut selection(c.dashboard.cursor(), alerts.len()));

    let activity = split(
        Direction::Vertical,
        middle[1],
        &[Constraint::Min(6), Constraint::Length(4)],
    );
    let series = activity_series();
    let bars: Vec<(&str, u64)> = series.iter().map(|p| (p.time, p.searches)).collect();
    let chart = BarChart::default()
        .block(panel("Activity - searches per hour"))
        .data(bars.as_slice())
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(ACCENT));
    f.render_widget(chart, activity[0]);

    let join = |values: Vec<u64>| {
        values
            .iter()
            .map(|v| format!("{:>5}", v))
            .collect::<Vec<_>>()
            .join("")
    };
    let totals = vec![
        Line::from(format!(
            "Profiles {}",
            join(series.iter().map(|p| p.profiles).collect())
        )),
        Line::from(format!(
            "Alerts   {}",
            join(series.iter().map(|p| p.alerts).collect())
        )),
    ];
    f.render_widget(Paragraph::new(totals).block(panel("Per hour")), activity[1]);

    let targets = recent_targets(&c.store().targets());
    let target_rows: Vec<Row> = targets
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.name.clone()),
                status_cell(t.status),
                risk_cell(t.risk),
                Cell::from(t.last_update.clone()),
            ])
        })
        .collect();
    let table = Table::new(
        target_rows,
        [
            Constraint::Length(9),
            Constraint::Min(20),
            Constraint::Length(22),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header(&["ID", "Name", "Status", "Risk", "Updated"]))
    .block(panel("Recent targets"));
    f.render_widget(table, rows[2]);
}

// ---- search ----

pub fn search(f: &mut Frame, area: Rect, c: &Console, criteria_cursor: Option<usize>) {
    let s = &c.search;
    let rows = split(Direction::Vertical, area, &[Constraint::Length(6), Constraint::Min(5)]);

    let query = if s.query.is_empty() {
        "<press / to type>".to_string()
    } else {
        s.query.clone()
    };
    let form = vec![
        field_line("Query", query, false),
        field_line("Source", s.source.label(), false),
        field_line("Type", s.kind.as_str(), false),
        field_line("Criteria", format!("{} selected", s.criteria().len()), false),
    ];
    f.render_widget(Paragraph::new(form).block(panel("OSINT Search")), rows[0]);

    if s.is_searching() {
        let text = Paragraph::new(format!("Searching '{}'...", s.query.trim()))
            .style(Style::default().fg(KEY))
            .block(panel("Results"));
        f.render_widget(text, rows[1]);
    } else if s.show_tips() {
        let tips: Vec<ListItem> = SEARCH_TIPS
            .iter()
            .map(|tip| ListItem::new(format!("• {}", tip)))
            .collect();
        f.render_widget(List::new(tips).block(panel("Search tips")), rows[1]);
    } else if s.results().is_empty() {
        f.render_widget(
            Paragraph::new("No results for this source filter.").block(panel("Results")),
            rows[1],
        );
    } else {
        let cols = split(
            Direction::Horizontal,
            rows[1],
            &[Constraint::Percentage(60), Constraint::Percentage(40)],
        );
        let result_rows: Vec<Row> = s
            .results()
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.name.clone()),
                    Cell::from(r.kind.clone()),
                    Cell::from(r.source.label()),
                    Cell::from(r.reliability.label()),
                    Cell::from(format!("{}%", r.confidence)),
                ])
            })
            .collect();
        let table = Table::new(
            result_rows,
            [
                Constraint::Min(18),
                Constraint::Length(14),
                Constraint::Length(16),
                Constraint::Length(10),
                Constraint::Length(6),
            ],
        )
        .header(header(&["Name", "Type", "Source", "Reliab.", "Conf."]))
        .block(panel(format!("Results ({})", s.results().len())))
        .row_highlight_style(theme::highlight());
        f.render_stateful_widget(table, cols[0], &mut selection(s.cursor(), s.results().len()));

        if let Some(r) = s.selected_result() {
            let mut lines = vec![
                Line::from(Span::styled(r.name.clone(), theme::title())),
                Line::from(format!("Updated {}", r.last_update)),
                Line::from(""),
            ];
            lines.extend(r.data.iter().map(|(k, v)| {
                Line::from(vec![
                    Span::styled(format!("{:<14}", k), Style::default().fg(DIM)),
                    Span::raw(v.clone()),
                ])
            }));
            f.render_widget(
                Paragraph::new(lines).wrap(Wrap { trim: true }).block(panel("Details")),
                cols[1],
            );
        }
    }

    if let Some(cursor) = criteria_cursor {
        let lines = FACEBOOK_CRITERIA
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let check = if s.is_criterion_selected(name) { "[x]" } else { "[ ]" };
                let style = if i == cursor {
                    theme::highlight()
                } else {
                    Style::default()
                };
                Line::from(Span::styled(format!("{} {}", check, name), style))
            })
            .collect();
        popup(f, centered_rect(50, 70, area), "Facebook criteria", lines);
    }
}

// ---- profiles ----

pub fn profiles(f: &mut Frame, area: Rect, c: &Console) {
    let targets = c.store().targets();
    let cards = profile_cards(&targets);
    let current = c.profiles.current(&targets);
    let cols = split(
        Direction::Horizontal,
        area,
        &[Constraint::Percentage(45), Constraint::Percentage(55)],
    );

    let rows: Vec<Row> = cards
        .iter()
        .map(|card| {
            Row::new(vec![
                Cell::from(card.id.to_string()),
                Cell::from(card.name.clone()),
                status_cell(card.status),
                risk_cell(card.risk),
            ])
        })
        .collect();
    let selected = current
        .as_ref()
        .and_then(|t| cards.iter().position(|card| card.id == t.id))
        .unwrap_or(0);
    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Min(16),
            Constraint::Length(22),
            Constraint::Length(9),
        ],
    )
    .header(header(&["ID", "Name", "Status", "Risk"]))
    .block(panel(format!("Profiles ({})", cards.len())))
    .row_highlight_style(theme::highlight());
    f.render_stateful_widget(table, cols[0], &mut selection(selected, cards.len()));

    let Some(target) = current else {
        f.render_widget(Paragraph::new("No profiles.").block(panel("Profile")), cols[1]);
        return;
    };

    let detail = ProfileDetail::synthetic();
    let pairs = |pairs: &[(&'static str, &'static str)]| -> Vec<Line<'static>> {
        pairs
            .iter()
            .map(|(k, v)| {
                Line::from(vec![
                    Span::styled(format!("  {:<12}", k), Style::default().fg(DIM)),
                    Span::raw(*v),
                ])
            })
            .collect()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(target.name.clone(), theme::title()),
            Span::raw(format!("  {}  updated {}", target.id, target.last_update)),
        ]),
        Line::from(vec![
            Span::styled(target.status.label(), Style::default().fg(theme::status_color(target.status))),
            Span::raw(" | risk "),
            Span::styled(target.risk.label(), Style::default().fg(theme::risk_color(target.risk))),
        ]),
        Line::from(""),
        section("Personal"),
    ];
    lines.extend(pairs(&detail.personal));
    lines.push(section("Professional"));
    lines.extend(pairs(&detail.professional));
    lines.push(section("Social"));
    lines.extend(pairs(&detail.social));
    lines.push(section("Interests"));
    lines.push(Line::from(format!("  {}", detail.interests.join(", "))));
    lines.push(section("Connections"));
    lines.extend(detail.connections.iter().map(|conn| {
        Line::from(format!("  {} - {} ({})", conn.name, conn.relation, conn.platform))
    }));
    lines.push(section("Timeline"));
    lines.extend(detail.timeline.iter().map(|entry| {
        Line::from(vec![
            Span::raw(format!("  {} {} ", entry.date, entry.event)),
            Span::styled(entry.importance, Style::default().fg(theme::priority_color(entry.importance))),
        ])
    }));
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(panel("Profile")),
        cols[1],
    );

    if let Some(form) = c.profiles.edit_form() {
        target_form(
            f,
            area,
            &format!("Edit {}", form.target_id),
            &form.name,
            form.status,
            form.risk,
            form.focus,
        );
    }

    if let Some(id) = c.profiles.pending_delete() {
        let name = targets
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
            .unwrap_or("?");
        confirm(f, area, &format!("Delete profile {} ({})?", name, id));
    }
}

// ---- analysis ----

pub fn analysis(f: &mut Frame, area: Rect, c: &Console) {
    let tab = c.analysis.tab;
    let rows = split(Direction::Vertical, area, &[Constraint::Length(3), Constraint::Min(5)]);
    f.render_widget(tab_strip(tab), rows[0]);
    let body = rows[1];

    match tab {
        AnalysisTab::Trends => {
            let cols = split(
                Direction::Horizontal,
                body,
                &[Constraint::Percentage(60), Constraint::Percentage(40)],
            );
            let series = trend_series();
            let bars: Vec<(&str, u64)> = series.iter().map(|p| (p.day, p.mentions as u64)).collect();
            let chart = BarChart::default()
                .block(panel("Mentions per day"))
                .data(bars.as_slice())
                .bar_width(5)
                .bar_gap(1)
                .bar_style(Style::default().fg(ACCENT));
            f.render_widget(chart, cols[0]);

            let rows: Vec<Row> = series
                .iter()
                .map(|p| {
                    Row::new(vec![
                        p.day.to_string(),
                        p.mentions.to_string(),
                        p.sentiment.to_string(),
                        p.activity.to_string(),
                    ])
                })
                .collect();
            let table = Table::new(rows, [Constraint::Length(6); 4])
                .header(header(&["Day", "Ment.", "Sent.", "Act."]))
                .block(panel("Weekly series"));
            f.render_widget(table, cols[1]);
        }
        AnalysisTab::Risks => {
            let cols = split(
                Direction::Horizontal,
                body,
                &[Constraint::Percentage(50), Constraint::Percentage(50)],
            );
            let risks = risk_distribution();
            let bars: Vec<(&str, u64)> = risks.iter().map(|s| (s.label, s.value as u64)).collect();
            let chart = BarChart::default()
                .block(panel("Risk distribution"))
                .data(bars.as_slice())
                .bar_width(9)
                .bar_gap(2)
                .bar_style(Style::default().fg(BAD));
            f.render_widget(chart, cols[0]);

            let right = split(Direction::Vertical, cols[1], &[Constraint::Length(6), Constraint::Min(4)]);
            let live: Vec<Row> = live_risk_breakdown(&c.store().targets())
                .into_iter()
                .map(|(risk, count)| Row::new(vec![risk_cell(risk), Cell::from(count.to_string())]))
                .collect();
            f.render_widget(
                Table::new(live, [Constraint::Length(10), Constraint::Length(6)])
                    .block(panel("Session targets by risk")),
                right[0],
            );

            let sources: Vec<Row> = source_distribution()
                .into_iter()
                .map(|s| Row::new(vec![s.label.to_string(), s.value.to_string()]))
                .collect();
            f.render_widget(
                Table::new(sources, [Constraint::Length(12), Constraint::Length(6)])
                    .block(panel("Sources")),
                right[1],
            );
        }
        AnalysisTab::Networks => {
            let summary = network_summary();
            let mut lines = vec![
                Line::from(format!("Nodes     {}", summary.nodes)),
                Line::from(format!("Edges     {}", summary.edges)),
                Line::from(format!("Clusters  {}", summary.clusters)),
                Line::from(format!("Density   {:.2}", summary.density)),
                Line::from(""),
                section("Influential nodes"),
            ];
            lines.extend(influential_nodes().iter().map(|node| {
                Line::from(vec![
                    Span::styled(format!("  [{}] ", node.initials()), Style::default().fg(KEY)),
                    Span::raw(format!("{:<20} centrality {:.2}", node.name, node.centrality)),
                ])
            }));
            f.render_widget(Paragraph::new(lines).block(panel("Relationship graph")), body);
        }
        AnalysisTab::Signals => {
            let rows: Vec<Row> = weak_signals()
                .into_iter()
                .map(|s| {
                    Row::new(vec![
                        Cell::from(s.kind),
                        Cell::from(s.description),
                        priority_cell(s.importance),
                        Cell::from(s.date),
                        Cell::from(s.status),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(12),
                    Constraint::Min(30),
                    Constraint::Length(9),
                    Constraint::Length(11),
                    Constraint::Length(12),
                ],
            )
            .header(header(&["Type", "Description", "Import.", "Date", "Status"]))
            .block(panel("Weak signals"));
            f.render_widget(table, body);
        }
    }
}

// ---- surveillance ----

pub fn surveillance(f: &mut Frame, area: Rect, c: &Console) {
    let sv = &c.surveillance;
    let rows = split(Direction::Vertical, area, &[Constraint::Length(3), Constraint::Min(5)]);
    f.render_widget(tab_strip(sv.tab), rows[0]);
    let targets = c.store().targets();

    let (table, len) = match sv.tab {
        SurveillanceTab::Realtime => {
            let events = realtime_events(&targets);
            let len = events.len();
            let rows: Vec<Row> = events
                .into_iter()
                .map(|e| {
                    Row::new(vec![
                        Cell::from(e.time),
                        Cell::from(e.kind),
                        Cell::from(e.target),
                        Cell::from(e.event),
                        Cell::from(e.location),
                        priority_cell(e.priority),
                        Cell::from(e.status),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(9),
                    Constraint::Length(14),
                    Constraint::Length(18),
                    Constraint::Min(24),
                    Constraint::Length(18),
                    Constraint::Length(9),
                    Constraint::Length(12),
                ],
            )
            .header(header(&["Time", "Type", "Target", "Event", "Location", "Priority", "Status"]))
            .block(panel("Realtime feed"));
            (table, len)
        }
        SurveillanceTab::Targets => {
            let active = sv.active_targets(&targets);
            let len = active.len();
            let rows: Vec<Row> = active
                .into_iter()
                .map(|t| {
                    Row::new(vec![
                        Cell::from(t.name),
                        Cell::from(t.presence.label()),
                        Cell::from(t.last_seen),
                        Cell::from(t.location),
                        risk_cell(t.risk),
                        Cell::from(t.activities.to_string()),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Min(18),
                    Constraint::Length(9),
                    Constraint::Length(10),
                    Constraint::Length(12),
                    Constraint::Length(9),
                    Constraint::Length(10),
                ],
            )
            .header(header(&["Target", "Status", "Last seen", "Location", "Risk", "Activity"]))
            .block(panel("Active targets"));
            (table, len)
        }
        SurveillanceTab::Zones => {
            let zones = zones();
            let len = zones.len();
            let rows: Vec<Row> = zones
                .into_iter()
                .map(|z| {
                    let marker = if sv.selected_zone() == Some(z.id) { "▶" } else { " " };
                    Row::new(vec![
                        marker.to_string(),
                        z.name.to_string(),
                        z.location.to_string(),
                        z.targets.to_string(),
                        z.alerts.to_string(),
                        z.status.to_string(),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(2),
                    Constraint::Length(12),
                    Constraint::Min(22),
                    Constraint::Length(8),
                    Constraint::Length(7),
                    Constraint::Length(8),
                ],
            )
            .header(header(&["", "Zone", "Location", "Targets", "Alerts", "Status"]))
            .block(panel("Zones"));
            (table, len)
        }
    };

    let table = table.row_highlight_style(theme::highlight());
    f.render_stateful_widget(table, rows[1], &mut selection(sv.cursor(), len));
}

// ---- reports ----

pub fn reports(f: &mut Frame, area: Rect, c: &Console) {
    let r = &c.reports;
    let rows = split(
        Direction::Vertical,
        area,
        &[
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(7),
            Constraint::Length(3),
        ],
    );

    let filter = Line::from(vec![
        Span::styled("Type ", Style::default().fg(DIM)),
        Span::raw(r.type_filter.map_or("All", |t| t.label())),
        Span::styled("   Range ", Style::default().fg(DIM)),
        Span::raw(r.date_range.label()),
        Span::styled("   Query ", Style::default().fg(DIM)),
        Span::raw(if r.query.is_empty() { "-".to_string() } else { r.query.clone() }),
    ]);
    f.render_widget(Paragraph::new(filter).block(panel("Filters")), rows[0]);

    let filtered = r.filtered();
    let table_rows: Vec<Row> = filtered
        .iter()
        .map(|report| {
            Row::new(vec![
                Cell::from(report.id),
                Cell::from(report.title),
                Cell::from(report.kind.label()),
                Cell::from(report.date),
                Cell::from(report.status),
                Cell::from(report.pages.to_string()),
                priority_cell(report.priority),
            ])
        })
        .collect();
    let table = Table::new(
        table_rows,
        [
            Constraint::Length(8),
            Constraint::Min(30),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(9),
        ],
    )
    .header(header(&["ID", "Title", "Type", "Date", "Status", "Pages", "Priority"]))
    .block(panel(format!("Reports ({})", filtered.len())))
    .row_highlight_style(theme::highlight());
    f.render_stateful_widget(table, rows[1], &mut selection(r.cursor(), filtered.len()));

    let detail = match r.selected().or_else(|| r.highlighted()) {
        Some(report) => vec![
            Line::from(Span::styled(report.title, theme::title())),
            Line::from(format!("{} | {} | {}", report.id, report.author, report.date)),
            Line::from(format!("Targets: {}", report.targets.join(", "))),
            Line::from(report.summary),
        ],
        None => vec![Line::from("No report matches the filters.")],
    };
    let title = if r.selected().is_some() { "Open report" } else { "Summary" };
    f.render_widget(
        Paragraph::new(detail).wrap(Wrap { trim: true }).block(panel(title)),
        rows[2],
    );

    let stats = r.stats();
    let counters = Line::from(vec![
        Span::styled("Total ", Style::default().fg(DIM)),
        Span::styled(stats.total.to_string(), Style::default().fg(TEXT)),
        Span::styled("   In progress ", Style::default().fg(DIM)),
        Span::styled(stats.in_progress.to_string(), Style::default().fg(KEY)),
        Span::styled("   Completed ", Style::default().fg(DIM)),
        Span::styled(stats.completed.to_string(), Style::default().fg(GOOD)),
        Span::styled("   Avg. pages ", Style::default().fg(DIM)),
        Span::styled(stats.avg_pages.to_string(), Style::default().fg(ACCENT)),
    ]);
    f.render_widget(Paragraph::new(counters).block(panel("Statistics")), rows[3]);

    if r.is_picking_template() {
        let lines = templates()
            .iter()
            .enumerate()
            .flat_map(|(i, t)| {
                let style = if i == r.template_cursor() {
                    theme::highlight()
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                [
                    Line::from(Span::styled(t.name, style)),
                    Line::from(Span::styled(format!("  {}", t.description), Style::default().fg(DIM))),
                ]
            })
            .collect();
        popup(f, centered_rect(50, 50, area), "New report from template", lines);
    }
}

// ---- settings ----

pub fn settings(f: &mut Frame, area: Rect, c: &Console) {
    let s = &c.settings;
    let rows = split(Direction::Vertical, area, &[Constraint::Length(3), Constraint::Min(5)]);
    f.render_widget(tab_strip(s.tab), rows[0]);

    if s.tab == SettingsTab::System {
        let lines: Vec<Line> = system_status()
            .into_iter()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<18}", name), Style::default().fg(DIM)),
                    Span::styled(value, Style::default().fg(GOOD)),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines).block(panel("System information")), rows[1]);
    } else {
        let fields = s.settings.fields(s.tab);
        let len = fields.len();
        let table_rows: Vec<Row> = fields
            .into_iter()
            .map(|field| Row::new(vec![field.label.to_string(), field.value.display()]))
            .collect();
        let table = Table::new(table_rows, [Constraint::Length(28), Constraint::Min(20)])
            .block(panel(s.tab.label()))
            .row_highlight_style(theme::highlight());
        f.render_stateful_widget(table, rows[1], &mut selection(s.cursor(), len));
    }

    if s.pending_reset() {
        confirm(f, area, "Reset all settings to their defaults?");
    }
}

// ---- overlays ----

/// Name / status / risk form used for new and edited targets
pub fn target_form(
    f: &mut Frame,
    area: Rect,
    title: &str,
    name: &str,
    status: TargetStatus,
    risk: RiskLevel,
    focus: EditField,
) {
    let lines = vec![
        Line::from(""),
        field_line("Name", format!("{}_", name), focus == EditField::Name),
        field_line("Status", status.label(), focus == EditField::Status),
        field_line("Risk", risk.label(), focus == EditField::Risk),
        Line::from(""),
        Line::from(Span::styled(
            "[Tab] next field  [Space] change  [Enter] save  [Esc] cancel",
            Style::default().fg(DIM),
        )),
    ];
    popup(f, centered_rect(50, 40, area), title, lines);
}

pub fn confirm(f: &mut Frame, area: Rect, question: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(question.to_string(), Style::default().fg(KEY))),
        Line::from(""),
        Line::from("[y] confirm  [n] cancel"),
    ];
    popup(f, centered_rect(50, 25, area), "Confirm", lines);
}

pub fn text_input(f: &mut Frame, area: Rect, label: &str, buffer: &str) {
    let lines = vec![Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(DIM)),
        Span::styled(format!("{}_", buffer), Style::default().fg(KEY)),
    ])];
    popup(f, centered_rect(60, 15, area), "Input", lines);
}
