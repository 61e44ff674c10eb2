use crossterm::style::Stylize;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Fatal,
    Warning,
    Stale,
    Fresh,
    Arrow,
    Index,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        match (supports_unicode, self) {
            (true, Icon::Success) => theme::icons::SUCCESS,
            (true, Icon::Error) => theme::icons::ERROR,
            (true, Icon::Fatal) => theme::icons::FATAL,
            (true, Icon::Warning) => theme::icons::WARNING,
            (true, Icon::Stale) => theme::icons::STALE,
            (true, Icon::Fresh) => theme::icons::FRESH,
            (true, Icon::Arrow) => theme::icons::ARROW,
            (true, Icon::Index) => theme::icons::INDEX,
            (false, Icon::Success) => theme::icons_ascii::SUCCESS,
            (false, Icon::Error) => theme::icons_ascii::ERROR,
            (false, Icon::Fatal) => theme::icons_ascii::FATAL,
            (false, Icon::Warning) => theme::icons_ascii::WARNING,
            (false, Icon::Stale) => theme::icons_ascii::STALE,
            (false, Icon::Fresh) => theme::icons_ascii::FRESH,
            (false, Icon::Arrow) => theme::icons_ascii::ARROW,
            (false, Icon::Index) => theme::icons_ascii::INDEX,
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success => theme::colors::SUCCESS,
            Icon::Error | Icon::Fatal => theme::colors::ERROR,
            Icon::Warning | Icon::Stale => theme::colors::WARNING,
            Icon::Fresh | Icon::Arrow => theme::colors::DIM,
            Icon::Index => theme::colors::INFO,
        };
        format!("{}", s.with(color))
    }
}
