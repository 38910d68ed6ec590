//! Terminal line editor driving the console.
//!
//! Interactive mode uses crossterm raw mode:
//! - printable characters append, Backspace removes the last one
//! - Tab completes the line and prints suggestions above the prompt
//! - Enter submits, Esc clears the line
//! - Up/Down browse history, keeping the unsent line as a draft
//! - Ctrl-L redraws the recent output, Ctrl-C or Ctrl-D on an empty line exits
//!
//! Piped input is read line by line and submitted as is.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use std::io::{self, BufRead, Write};

use tabline_core::{CompletionOptions, Console, OutputLog, TextSink};

use crate::demo::Session;

const PROMPT: &str = "> ";

/// Output sink that keeps scrollback and remembers what has not been printed yet.
#[derive(Debug, Default)]
pub struct ScreenSink {
    log: OutputLog,
    unseen: Vec<String>,
}

impl ScreenSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            log: OutputLog::new(capacity),
            unseen: Vec::new(),
        }
    }

    /// Lines written since the last call, oldest first.
    pub fn take_unseen(&mut self) -> Vec<String> {
        std::mem::take(&mut self.unseen)
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }
}

impl TextSink for ScreenSink {
    fn push_line(&mut self, line: &str) {
        self.log.push_line(line);
        self.unseen.push(line.to_string());
    }
}

/// What the loop should do after a key has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Nothing visible changed.
    Idle,
    /// The input line changed.
    Redraw,
    /// A line was submitted to the console.
    Submitted,
    /// Repaint recent output from scrollback.
    Refresh,
    Exit,
}

/// The line being edited.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Apply one key press to the buffer and the console.
    pub fn handle_key<S: TextSink>(
        &mut self,
        console: &mut Console<S>,
        key: KeyEvent,
    ) -> EditorAction {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => EditorAction::Exit,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                if self.buffer.is_empty() {
                    EditorAction::Exit
                } else {
                    EditorAction::Idle
                }
            }
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => EditorAction::Refresh,
            (KeyCode::Tab, _) => {
                let options = CompletionOptions::interactive();
                if let Some(line) = console.complete(&self.buffer, options) {
                    self.buffer = line;
                }
                EditorAction::Redraw
            }
            (KeyCode::Enter, _) => {
                let line = std::mem::take(&mut self.buffer);
                console.submit(&line);
                EditorAction::Submitted
            }
            (KeyCode::Esc, _) => {
                self.buffer.clear();
                EditorAction::Redraw
            }
            (KeyCode::Up, _) => match console.history_older(&self.buffer) {
                Some(entry) => {
                    self.buffer = entry;
                    EditorAction::Redraw
                }
                None => EditorAction::Idle,
            },
            (KeyCode::Down, _) => match console.history_newer() {
                Some(entry) => {
                    self.buffer = entry;
                    EditorAction::Redraw
                }
                None => EditorAction::Idle,
            },
            (KeyCode::Backspace, _) => {
                self.buffer.pop();
                EditorAction::Redraw
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.buffer.push(c);
                EditorAction::Redraw
            }
            _ => EditorAction::Idle,
        }
    }
}

/// Run the raw-mode editor until the user exits or submits `quit`.
pub fn run_interactive(console: &mut Console<ScreenSink>, session: &Session) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = interactive_loop(console, session);
    terminal::disable_raw_mode()?;

    print!("\r\n");
    io::stdout().flush()?;
    result
}

fn interactive_loop(console: &mut Console<ScreenSink>, session: &Session) -> io::Result<()> {
    let mut editor = LineEditor::default();
    flush_output(console, &editor)?;

    loop {
        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match editor.handle_key(console, key) {
            EditorAction::Exit => return Ok(()),
            EditorAction::Idle => {}
            EditorAction::Refresh => repaint(console, &editor)?,
            EditorAction::Redraw | EditorAction::Submitted => flush_output(console, &editor)?,
        }

        if session.should_quit() {
            return Ok(());
        }
    }
}

/// Print pending output above the prompt, then redraw the input line.
fn flush_output(console: &mut Console<ScreenSink>, editor: &LineEditor) -> io::Result<()> {
    let mut stdout = io::stdout();
    for line in console.sink_mut().take_unseen() {
        write!(stdout, "\r\x1b[2K{line}\r\n")?;
    }
    redraw_input(editor.buffer())
}

/// Clear the screen and show the most recent output lines.
fn repaint(console: &mut Console<ScreenSink>, editor: &LineEditor) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(
        stdout,
        "{}{}",
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    let display = console.config().output.display_lines;
    let mut recent: Vec<&str> = console.sink().log().recent(display).collect();
    recent.reverse();
    for line in recent {
        write!(stdout, "{line}\r\n")?;
    }
    console.sink_mut().take_unseen();
    redraw_input(editor.buffer())
}

fn redraw_input(buffer: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    // Move to start of line and clear
    write!(stdout, "\r\x1b[2K")?;
    write!(stdout, "\x1b[1;34m{PROMPT}\x1b[0m{buffer}")?;
    stdout.flush()
}

/// Submit each line of stdin, printing console output as it appears.
pub fn run_lines(console: &mut Console<ScreenSink>, session: &Session) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in console.sink_mut().take_unseen() {
        writeln!(stdout, "{line}")?;
    }

    for line in stdin.lock().lines() {
        let line = line?;
        console.submit(&line);
        for output in console.sink_mut().take_unseen() {
            writeln!(stdout, "{output}")?;
        }
        if session.should_quit() {
            break;
        }
    }
    tracing::debug!(entries = console.history().len(), "Input finished");
    Ok(())
}
