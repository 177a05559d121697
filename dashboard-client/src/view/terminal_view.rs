use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use log::warn;
use std::fmt::Write as _;
use std::io::{self, Write};

use super::page_model::{DashboardView, PageModel, Slot};

/// Shown in slots that were never written
const PLACEHOLDER: &str = "--";

/// How [`TerminalView`] draws each committed update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Clear the screen and redraw the whole dashboard
    Screen,
    /// Append one summary line, suitable for logs and pipes
    Plain,
}

/// Dashboard rendered to a terminal (or any writer)
pub struct TerminalView<W: Write> {
    page: PageModel,
    out: W,
    mode: RenderMode,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(mode: RenderMode) -> Self {
        Self::new(io::stdout(), mode)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, mode: RenderMode) -> Self {
        Self {
            page: PageModel::new(),
            out,
            mode,
        }
    }

    pub const fn page(&self) -> &PageModel {
        &self.page
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn slot_text(&self, slot: Slot) -> &str {
        match self.page.text(slot) {
            "" => PLACEHOLDER,
            text => text,
        }
    }

    /// Full multi-line dashboard
    pub fn render_screen(&self) -> String {
        let mut screen = String::new();
        let _ = writeln!(
            screen,
            "Comfort Monitor                [{}]",
            self.slot_text(Slot::ConnectionStatus)
        );
        let _ = writeln!(screen, "--------------------------------------------");
        let rows = [
            ("Temperature", Slot::Temperature),
            ("Humidity", Slot::Humidity),
            ("Feels like", Slot::HeatIndex),
            ("Comfort", Slot::ComfortStatus),
            ("Device", Slot::DeviceId),
            ("Last update", Slot::Timestamp),
        ];
        for (label, slot) in rows {
            let _ = writeln!(screen, "  {:<12} {}", label, self.slot_text(slot));
        }
        let card = self.page.classes(Slot::StatusCard).join(" ");
        if !card.is_empty() {
            let _ = writeln!(screen, "  {:<12} {}", "Style", card);
        }
        screen
    }

    /// One line summary of the current state
    pub fn render_line(&self) -> String {
        format!(
            "[{}] {} | {} | {} | feels {} | {} | {}",
            self.slot_text(Slot::ConnectionStatus),
            self.slot_text(Slot::DeviceId),
            self.slot_text(Slot::Temperature),
            self.slot_text(Slot::Humidity),
            self.slot_text(Slot::HeatIndex),
            self.slot_text(Slot::ComfortStatus),
            self.slot_text(Slot::Timestamp),
        )
    }

    fn draw(&mut self) -> io::Result<()> {
        match self.mode {
            RenderMode::Screen => {
                let screen = self.render_screen();
                execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
                self.out.write_all(screen.as_bytes())?;
            }
            RenderMode::Plain => {
                let line = self.render_line();
                writeln!(self.out, "{}", line)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> DashboardView for TerminalView<W> {
    fn set_text(&mut self, slot: Slot, text: &str) {
        self.page.set_text(slot, text);
    }

    fn set_class_name(&mut self, slot: Slot, class_name: &str) {
        self.page.set_class_name(slot, class_name);
    }

    fn add_class(&mut self, slot: Slot, class: &str) {
        self.page.add_class(slot, class);
    }

    fn commit(&mut self) {
        self.page.commit();
        if let Err(e) = self.draw() {
            warn!("Failed to draw dashboard: {}", e);
        }
    }
}
