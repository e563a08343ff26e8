//! Terminal palette and clap help styling.

use anstyle::{AnsiColor, Color, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

pub(crate) const SUCCESS: Style = fg(AnsiColor::Green);
pub(crate) const ERROR: Style = fg(AnsiColor::Red);
/// Directive diagnostics and other recoverable problems.
pub(crate) const WARNING: Style = fg(AnsiColor::Yellow);
/// Environment names and section titles.
pub(crate) const HEADER: Style = Style::new().effects(Effects::BOLD);
pub(crate) const LABEL: Style = Style::new().effects(Effects::BOLD);
/// Parent definitions, descriptions and other secondary detail.
pub(crate) const DIM: Style = Style::new().effects(Effects::DIMMED);

/// Help output styles matching the palette above.
pub(crate) fn clap_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .header(fg(AnsiColor::Blue).effects(Effects::BOLD))
        .usage(fg(AnsiColor::Blue).effects(Effects::BOLD))
        .literal(fg(AnsiColor::Cyan))
        .placeholder(fg(AnsiColor::Cyan))
        .error(fg(AnsiColor::Red).effects(Effects::BOLD))
        .valid(fg(AnsiColor::Green))
        .invalid(fg(AnsiColor::Yellow))
}
