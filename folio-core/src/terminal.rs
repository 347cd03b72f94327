//! Command interpreter behind the Terminal window.
//!
//! A line is trimmed, split on whitespace, its command lower-cased and
//! aliases resolved, then dispatched through [`COMMANDS`]. Commands that
//! touch windows go through [`Desktop::dispatch`] so subscribers see them.

use crate::desktop::{Desktop, DesktopAction};
use crate::types::AppType;
use crate::window::WindowOp;
use crate::{Error, Result};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Maximum number of entries kept in the session history.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Default,
    Mocha,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Default, Theme::Mocha];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Mocha => "mocha",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Theme::Default),
            "mocha" => Ok(Theme::Mocha),
            _ => Err(Error::InvalidArgument(format!("unknown theme: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    Info,
    Success,
    Error,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub style: LineStyle,
    pub text: String,
}

impl OutputLine {
    pub fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Plain, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Error, text)
    }

    pub fn muted(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Muted, text)
    }
}

/// What the caller should do after a line was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to run (blank input).
    Empty,
    Output(Vec<OutputLine>),
    /// The transcript was cleared.
    Cleared,
    /// The terminal window was closed; print these lines first.
    Closed(Vec<OutputLine>),
}

impl Outcome {
    pub fn lines(&self) -> &[OutputLine] {
        match self {
            Outcome::Output(lines) | Outcome::Closed(lines) => lines,
            Outcome::Empty | Outcome::Cleared => &[],
        }
    }
}

/// A command that was run and the output it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub input: String,
    pub output: Vec<OutputLine>,
}

/// Handlers receive the canonical command name and its arguments.
type Handler = fn(&mut Terminal, &str, &[&str], &mut Desktop) -> Outcome;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    handler: Handler,
}

pub const ALIASES: &[(&str, &str)] = &[("ps", "windows"), ("quit", "exit"), ("max", "fullscreen")];

pub static COMMANDS: &[Command] = &[
    Command { name: "help", usage: "help", summary: "List available commands", handler: cmd_help },
    Command { name: "about", usage: "about", summary: "Open the About window", handler: cmd_open_self },
    Command { name: "projects", usage: "projects", summary: "Open the Projects window", handler: cmd_open_self },
    Command { name: "skills", usage: "skills", summary: "Open the Skills window", handler: cmd_open_self },
    Command { name: "contact", usage: "contact", summary: "Open Contact / Socials", handler: cmd_open_self },
    Command { name: "shorten", usage: "shorten", summary: "Open the link shortener", handler: cmd_open_self },
    Command { name: "open", usage: "open <app>", summary: "Open a window", handler: cmd_window },
    Command { name: "close", usage: "close <app>", summary: "Close a window", handler: cmd_window },
    Command { name: "min", usage: "min <app>", summary: "Minimize a window", handler: cmd_window },
    Command { name: "restore", usage: "restore <app>", summary: "Restore a minimized window", handler: cmd_window },
    Command { name: "focus", usage: "focus <app>", summary: "Bring a window to the front", handler: cmd_window },
    Command { name: "fullscreen", usage: "fullscreen <app>", summary: "Toggle fullscreen", handler: cmd_window },
    Command { name: "windows", usage: "windows", summary: "List open windows", handler: cmd_windows },
    Command { name: "zen", usage: "zen", summary: "Toggle zen mode", handler: cmd_zen },
    Command { name: "theme", usage: "theme [default|mocha]", summary: "Show or set the theme", handler: cmd_theme },
    Command { name: "history", usage: "history", summary: "Show commands entered this session", handler: cmd_history },
    Command { name: "clear", usage: "clear", summary: "Clear the terminal", handler: cmd_clear },
    Command { name: "exit", usage: "exit", summary: "Close the terminal", handler: cmd_exit },
];

/// Resolves aliases and returns the table entry for `name`.
pub fn lookup(name: &str) -> Option<&'static Command> {
    let lower = name.to_ascii_lowercase();
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, target)| *target)
        .unwrap_or(lower.as_str());
    COMMANDS.iter().find(|c| c.name == canonical)
}

/// Session state of one terminal.
#[derive(Debug, Default)]
pub struct Terminal {
    history: VecDeque<HistoryEntry>,
    theme: Theme,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    /// Runs one input line against `desktop`.
    pub fn execute(&mut self, line: &str, desktop: &mut Desktop) -> Outcome {
        let trimmed = line.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(name) = parts.next() else {
            return Outcome::Empty;
        };
        let args: Vec<&str> = parts.collect();

        let outcome = match lookup(name) {
            Some(command) => (command.handler)(self, command.name, &args, desktop),
            None => Outcome::Output(vec![OutputLine::error(format!(
                "Command not found: {}. Type help.",
                name
            ))]),
        };

        if outcome != Outcome::Cleared {
            self.record(trimmed, outcome.lines().to_vec());
        }
        outcome
    }

    fn record(&mut self, input: &str, output: Vec<OutputLine>) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            input: input.to_string(),
            output,
        });
    }
}

fn single(line: OutputLine) -> Outcome {
    Outcome::Output(vec![line])
}

fn cmd_help(_: &mut Terminal, _: &str, _: &[&str], _: &mut Desktop) -> Outcome {
    let mut lines = vec![OutputLine::info("Available commands:")];
    lines.extend(
        COMMANDS
            .iter()
            .map(|c| OutputLine::plain(format!("  {:<24}{}", c.usage, c.summary))),
    );
    let aliases: Vec<String> = ALIASES.iter().map(|(a, t)| format!("{} -> {}", a, t)).collect();
    lines.push(OutputLine::muted(format!("Aliases: {}", aliases.join(", "))));
    Outcome::Output(lines)
}

fn cmd_open_self(_: &mut Terminal, name: &str, _: &[&str], desktop: &mut Desktop) -> Outcome {
    match name.parse::<AppType>() {
        Ok(app) => {
            desktop.dispatch(DesktopAction::Window(WindowOp::Open, app));
            single(OutputLine::success(format!("Opening {}...", app.title())))
        }
        Err(e) => single(OutputLine::error(e.to_string())),
    }
}

fn window_op(name: &str) -> Option<(WindowOp, &'static str)> {
    match name {
        "open" => Some((WindowOp::Open, "Opened")),
        "close" => Some((WindowOp::Close, "Closed")),
        "min" => Some((WindowOp::Minimize, "Minimized")),
        "restore" => Some((WindowOp::Restore, "Restored")),
        "focus" => Some((WindowOp::BringToFront, "Focused")),
        "fullscreen" => Some((WindowOp::ToggleFullscreen, "Toggled fullscreen for")),
        _ => None,
    }
}

fn cmd_window(_: &mut Terminal, name: &str, args: &[&str], desktop: &mut Desktop) -> Outcome {
    let Some((op, verb)) = window_op(name) else {
        return single(OutputLine::error(format!("Command not found: {}. Type help.", name)));
    };
    let Some(target) = args.first() else {
        return single(OutputLine::error(format!("Usage: {} <app>", name)));
    };
    let app = match target.parse::<AppType>() {
        Ok(app) => app,
        Err(_) => {
            let names: Vec<&str> = AppType::ALL.iter().map(|a| a.as_str()).collect();
            return single(OutputLine::error(format!(
                "Unknown app: {}. Available: {}",
                target,
                names.join(", ")
            )));
        }
    };

    if op == WindowOp::ToggleFullscreen && !app.allows_fullscreen() {
        return single(OutputLine::error(format!("{} cannot go fullscreen", app)));
    }
    if matches!(op, WindowOp::Minimize | WindowOp::BringToFront) && !desktop.windows().is_open(app) {
        return single(OutputLine::error(format!("{} is not open", app)));
    }

    desktop.dispatch(DesktopAction::Window(op, app));
    single(OutputLine::success(format!("{} {}", verb, app)))
}

fn cmd_windows(_: &mut Terminal, _: &str, _: &[&str], desktop: &mut Desktop) -> Outcome {
    let windows = desktop.windows();
    if windows.stack().is_empty() {
        return single(OutputLine::muted("No open windows."));
    }

    let lines = windows
        .stack()
        .iter()
        .rev()
        .map(|app| {
            let mut flags = Vec::new();
            if windows.focused() == Some(*app) {
                flags.push("focused");
            }
            if windows.is_minimized(*app) {
                flags.push("minimized");
            }
            if windows.is_effectively_fullscreen(*app) {
                flags.push("fullscreen");
            }
            let text = if flags.is_empty() {
                app.as_str().to_string()
            } else {
                format!("{:<10} [{}]", app.as_str(), flags.join(", "))
            };
            OutputLine::plain(text)
        })
        .collect();
    Outcome::Output(lines)
}

fn cmd_zen(_: &mut Terminal, _: &str, _: &[&str], desktop: &mut Desktop) -> Outcome {
    if desktop.windows().is_zen() {
        desktop.dispatch(DesktopAction::SetZen(false));
        single(OutputLine::info("Exiting Zen Mode..."))
    } else {
        desktop.dispatch(DesktopAction::SetZen(true));
        single(OutputLine::info("Entering Zen Mode... (Type 'zen' to exit)"))
    }
}

fn cmd_theme(term: &mut Terminal, _: &str, args: &[&str], _: &mut Desktop) -> Outcome {
    let Some(requested) = args.first() else {
        return single(OutputLine::plain(format!("Current theme: {}", term.theme)));
    };
    match requested.parse::<Theme>() {
        Ok(theme) => {
            term.theme = theme;
            single(OutputLine::success(format!("Theme set to {}", theme)))
        }
        Err(_) => {
            let names: Vec<&str> = Theme::ALL.iter().map(|t| t.as_str()).collect();
            single(OutputLine::error(format!(
                "Unknown theme: {}. Available: {}",
                requested,
                names.join(", ")
            )))
        }
    }
}

fn cmd_history(term: &mut Terminal, _: &str, _: &[&str], _: &mut Desktop) -> Outcome {
    if term.history.is_empty() {
        return single(OutputLine::muted("No commands yet."));
    }
    let lines = term
        .history
        .iter()
        .enumerate()
        .map(|(i, entry)| OutputLine::plain(format!("{:>4}  {}", i + 1, entry.input)))
        .collect();
    Outcome::Output(lines)
}

fn cmd_clear(term: &mut Terminal, _: &str, _: &[&str], _: &mut Desktop) -> Outcome {
    term.history.clear();
    Outcome::Cleared
}

fn cmd_exit(_: &mut Terminal, _: &str, _: &[&str], desktop: &mut Desktop) -> Outcome {
    // Closing the zen app leaves zen first.
    desktop.dispatch(DesktopAction::Window(WindowOp::Close, AppType::Terminal));
    Outcome::Closed(vec![OutputLine::muted("Closing terminal...")])
}
