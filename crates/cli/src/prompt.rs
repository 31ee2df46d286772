//! Interactive terminal input.
//!
//! Passwords are read with the terminal in raw mode so nothing but `*` is
//! echoed. When stdin is not a terminal (piped input) one line is read
//! instead.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};
use pftracker_client::validation;

use crate::error::{AppError, Result};

const NEW_PASSWORD_ATTEMPTS: usize = 3;

/// Raw mode for as long as the guard lives.
struct RawTerminal;

impl RawTerminal {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().map_err(|err| AppError::Terminal(err.to_string()))?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!("failed to restore terminal mode: {err}");
        }
    }
}

/// What a key press did to the hidden input.
#[derive(Debug, PartialEq, Eq)]
enum Edit {
    Typed,
    Erased,
    Ignored,
    Submit,
    Cancel,
}

#[derive(Default)]
struct HiddenInput {
    value: String,
}

impl HiddenInput {
    fn apply(&mut self, key: &KeyEvent) -> Edit {
        if key.kind != KeyEventKind::Press {
            return Edit::Ignored;
        }
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => Edit::Submit,
            KeyCode::Esc => Edit::Cancel,
            KeyCode::Char('c' | 'd') if control => Edit::Cancel,
            KeyCode::Backspace if self.value.pop().is_some() => Edit::Erased,
            KeyCode::Char(ch) if !control => {
                self.value.push(ch);
                Edit::Typed
            }
            _ => Edit::Ignored,
        }
    }
}

/// Reads a password; typed characters show as `*`.
pub fn password(prompt: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        eprint!("{prompt}");
        return read_line();
    }

    let _raw = RawTerminal::enable()?;
    let mut out = io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;

    let mut input = HiddenInput::default();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match input.apply(&key) {
            Edit::Typed => execute!(out, Print("*"))?,
            Edit::Erased => execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?,
            Edit::Ignored => {}
            Edit::Submit => {
                execute!(out, Print("\r\n"))?;
                return Ok(input.value);
            }
            Edit::Cancel => {
                execute!(out, Print("\r\n"))?;
                return Err(AppError::Terminal("interrupted".to_string()));
            }
        }
    }
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks for a new password until it passes the password rules and is typed
/// the same way twice.
pub fn new_password() -> Result<String> {
    for _ in 0..NEW_PASSWORD_ATTEMPTS {
        let first = password("New password: ")?;
        if let Err(err) = validation::password(&first) {
            eprintln!("{}", err.message);
            continue;
        }
        if password("Repeat password: ")? == first {
            return Ok(first);
        }
        eprintln!("Passwords do not match.");
    }

    Err(AppError::Input(format!(
        "no valid password after {NEW_PASSWORD_ATTEMPTS} attempts"
    )))
}

/// Yes/no question on stderr; anything but `y`/`yes` declines.
pub fn confirm(question: &str) -> bool {
    eprint!("{question} [y/N] ");
    let _ = io::stderr().flush();

    match read_line() {
        Ok(answer) => is_yes(&answer),
        Err(_) => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
