use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

use crate::domain::models::Tone;

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub normal: Style,
    pub border: Style,
    pub border_focused: Style,
    pub connected: Style,
    pub disconnected: Style,
    pub busy: Style,
    pub table_header: Style,
    pub hint: Style,

    pub heading: Style,
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub accent: Style,
    pub label: Style,
    pub value: Style,
    pub muted: Style,
}

impl Theme {
    pub fn dark() -> Theme {
        return Theme {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            normal: Style::default().fg(Color::White),
            border: Style::default().fg(Color::Gray),
            border_focused: Style::default().fg(Color::LightBlue),
            connected: Style::default().fg(Color::LightGreen),
            disconnected: Style::default().fg(Color::Gray),
            busy: Style::default().fg(Color::Yellow),
            table_header: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
            hint: Style::default().fg(Color::DarkGray),

            heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            info: Style::default().fg(Color::LightBlue),
            success: Style::default().fg(Color::LightGreen),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::LightRed),
            accent: Style::default().fg(Color::Magenta),
            label: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
            value: Style::default().fg(Color::Cyan),
            muted: Style::default().fg(Color::Gray),
        };
    }

    pub fn tone(&self, tone: Tone) -> Style {
        match tone {
            Tone::Plain => return self.normal,
            Tone::Heading => return self.heading,
            Tone::Info => return self.info,
            Tone::Success => return self.success,
            Tone::Warning => return self.warning,
            Tone::Error => return self.error,
            Tone::Accent => return self.accent,
            Tone::Label => return self.label,
            Tone::Value => return self.value,
            Tone::Muted => return self.muted,
        }
    }
}
