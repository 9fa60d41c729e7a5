//! Console colours

use ratatui::style::{Color, Modifier, Style};

use vigil_core::{AlertKind, RiskLevel, TargetStatus};

pub const ACCENT: Color = Color::Cyan;
pub const KEY: Color = Color::Yellow;
pub const DIM: Color = Color::DarkGray;
pub const TEXT: Color = Color::White;
pub const GOOD: Color = Color::Green;
pub const BAD: Color = Color::Red;

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn highlight() -> Style {
    Style::default().fg(Color::Black).bg(ACCENT)
}

pub fn risk_color(risk: RiskLevel) -> Color {
    match risk {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::LightRed,
        RiskLevel::Critical => Color::Red,
    }
}

/// Colour for free-text priority labels ("Low" ... "Critical")
pub fn priority_color(priority: &str) -> Color {
    match priority {
        "Critical" => Color::Red,
        "High" => Color::LightRed,
        "Medium" => Color::Yellow,
        "Low" => Color::Green,
        _ => DIM,
    }
}

pub fn status_color(status: TargetStatus) -> Color {
    match status {
        TargetStatus::Profiling => Color::Blue,
        TargetStatus::UnderAnalysis => Color::Yellow,
        TargetStatus::ActiveSurveillance => Color::Red,
        TargetStatus::Validated => Color::Green,
    }
}

pub fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Success => Color::Green,
        AlertKind::Warning => Color::Yellow,
        AlertKind::Error => Color::Red,
        AlertKind::Info => Color::Blue,
    }
}
