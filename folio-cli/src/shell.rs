/// Interactive desktop shell for Folio
///
/// Runs the terminal command interpreter against a headless desktop, with
/// line editing, history, completion and dot meta-commands for inspecting
/// window state.

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use folio_core::terminal::{self, LineStyle, Outcome, OutputLine, Terminal, Theme};
use folio_core::{AppType, Desktop, DesktopAction, WindowOp};
use rustyline::error::ReadlineError;
use rustyline::{
    completion::{Completer, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    Helper,
};
use std::path::PathBuf;

use crate::table;

const META_COMMANDS: &[&str] = &[".help", ".windows", ".layout", ".dock", ".exit", ".quit"];

/// Commands whose first argument is an app name
const APP_ARG_COMMANDS: &[&str] = &["open", "close", "min", "restore", "focus", "fullscreen", "max"];

/// Autocomplete helper for terminal commands, app names and meta-commands
#[derive(Clone)]
struct FolioCompleter {
    commands: Vec<String>,
    apps: Vec<String>,
}

impl FolioCompleter {
    fn new() -> Self {
        let mut commands: Vec<String> = terminal::COMMANDS
            .iter()
            .map(|c| c.name.to_string())
            .collect();
        commands.extend(terminal::ALIASES.iter().map(|(alias, _)| alias.to_string()));
        commands.sort();

        Self {
            commands,
            apps: AppType::ALL.iter().map(|a| a.as_str().to_string()).collect(),
        }
    }

    fn matching(candidates: &[String], prefix: &str) -> Vec<Pair> {
        let prefix = prefix.to_lowercase();
        candidates
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .map(|c| Pair {
                display: c.clone(),
                replacement: c.clone(),
            })
            .collect()
    }
}

impl Completer for FolioCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_prefix = &line[..pos];

        if line_prefix.starts_with('.') {
            let meta: Vec<String> = META_COMMANDS.iter().map(|m| m.to_string()).collect();
            return Ok((0, Self::matching(&meta, line_prefix)));
        }

        // Second word: app name for window commands, theme name for `theme`
        let last_space = line_prefix
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace());
        if let Some((space_at, space)) = last_space {
            let word_start = space_at + space.len_utf8();
            let command = line_prefix.split_whitespace().next().unwrap_or("").to_lowercase();
            let word = &line_prefix[word_start..];
            let candidates = if APP_ARG_COMMANDS.contains(&command.as_str()) {
                Self::matching(&self.apps, word)
            } else if command == "theme" {
                let themes: Vec<String> = Theme::ALL.iter().map(|t| t.to_string()).collect();
                Self::matching(&themes, word)
            } else {
                Vec::new()
            };
            return Ok((word_start, candidates));
        }

        Ok((0, Self::matching(&self.commands, line_prefix)))
    }
}

impl Hinter for FolioCompleter {
    type Hint = String;
}

impl Highlighter for FolioCompleter {}

impl Validator for FolioCompleter {}

impl Helper for FolioCompleter {}

fn history_path() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".folio_history"))
        .unwrap_or_else(|| ".folio_history".into())
}

/// Interactive shell session state
pub struct Shell {
    desktop: Desktop,
    terminal: Terminal,
    editor: rustyline::Editor<FolioCompleter, rustyline::history::FileHistory>,
}

impl Shell {
    /// Create a new shell session with the terminal window open
    pub fn new() -> Result<Self> {
        let mut editor = rustyline::Editor::new().context("Failed to initialize line editor")?;
        editor.set_helper(Some(FolioCompleter::new()));

        let history_path = history_path();
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        let mut desktop = Desktop::default();
        desktop.dispatch(DesktopAction::Window(WindowOp::Open, AppType::Terminal));

        Ok(Self {
            desktop,
            terminal: Terminal::new(),
            editor,
        })
    }

    /// Run the interactive REPL
    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = self.prompt();
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with('.') {
                        if matches!(line, ".exit" | ".quit") {
                            break;
                        }
                        self.execute_meta_command(line);
                        continue;
                    }

                    if self.execute(line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error reading line: {}", err);
                    break;
                }
            }
        }

        self.print_goodbye();
        self.save_history()?;
        Ok(())
    }

    /// Runs a terminal command. Returns true when the terminal window closed.
    fn execute(&mut self, line: &str) -> bool {
        match self.terminal.execute(line, &mut self.desktop) {
            Outcome::Empty => false,
            Outcome::Output(lines) => {
                self.print_lines(&lines);
                false
            }
            Outcome::Cleared => {
                // ANSI: clear screen, cursor home
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            Outcome::Closed(lines) => {
                self.print_lines(&lines);
                true
            }
        }
    }

    fn execute_meta_command(&mut self, command: &str) {
        let cmd = command.split_whitespace().next().unwrap_or("");
        match cmd {
            ".help" => self.show_help(),
            ".windows" => println!("{}", table::format_windows_table(self.desktop.windows())),
            ".layout" => print!("{}", table::format_layout_table(&self.desktop.layout())),
            ".dock" => {
                if let Some(app) = command.split_whitespace().nth(1) {
                    match app.parse::<AppType>() {
                        Ok(app) => {
                            self.desktop
                                .dispatch(DesktopAction::Window(WindowOp::DockClick, app));
                            println!("Clicked {} in the dock", app);
                        }
                        Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                    }
                } else {
                    eprintln!("{} .dock <app>", "Usage:".yellow().bold());
                }
            }
            _ => eprintln!(
                "{} Unknown meta-command: {}. Type .help for help.",
                "Error:".red().bold(),
                cmd
            ),
        }
    }

    fn paint(&self, line: &OutputLine) -> ColoredString {
        let text = line.text.as_str();
        match (self.terminal.theme(), line.style) {
            (_, LineStyle::Error) => text.red(),
            (_, LineStyle::Muted) => text.dimmed(),
            (Theme::Default, LineStyle::Info) => text.cyan(),
            (Theme::Default, LineStyle::Success) => text.green(),
            (Theme::Mocha, LineStyle::Info) => text.truecolor(137, 180, 250),
            (Theme::Mocha, LineStyle::Success) => text.truecolor(166, 227, 161),
            (Theme::Default, LineStyle::Plain) => text.normal(),
            (Theme::Mocha, LineStyle::Plain) => text.truecolor(205, 214, 244),
        }
    }

    fn print_lines(&self, lines: &[OutputLine]) {
        for line in lines {
            println!("{}", self.paint(line));
        }
    }

    fn prompt(&self) -> String {
        let base = "guest@folio:~$";
        let prompt = if self.desktop.windows().is_zen() {
            format!("{} {}", "[zen]".magenta(), base.green().bold())
        } else {
            base.green().bold().to_string()
        };
        format!("{} ", prompt)
    }

    fn show_help(&self) {
        println!();
        println!("{}", "Terminal commands:".bold());
        println!("  Type {} for the command list.", "help".cyan());
        println!();
        println!("{}", "Meta-commands:".bold());
        println!("    .help              Show this help");
        println!("    .windows           Window manager state per app");
        println!("    .layout            Visible windows, menu bar and dock");
        println!("    .dock <app>        Click an app's dock icon");
        println!("    .exit, .quit       Leave the shell");
        println!();
        println!("{}", "Keyboard:".bold());
        println!("    Tab                Complete commands and app names");
        println!("    Up/Down Arrow      Navigate command history");
        println!("    Ctrl+D             Exit");
        println!();
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Folio desktop shell".cyan().bold());
        println!(
            "  Type {} for commands, {} for shell meta-commands, {} to leave.",
            "help".bold(),
            ".help".bold(),
            "exit".bold()
        );
        println!();
    }

    fn print_goodbye(&self) {
        println!();
        println!("{}", "Session saved. Your command history has been preserved.".dimmed());
    }

    fn save_history(&mut self) -> Result<()> {
        self.editor
            .save_history(&history_path())
            .context("Failed to save command history")?;
        Ok(())
    }
}
