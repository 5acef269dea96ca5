use unicode_segmentation::UnicodeSegmentation;

use crate::state::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Keys(Vec<Command>),
    History,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

pub fn command_for(key: &str) -> Option<Command> {
    let append = |continue_with_result| {
        Some(Command::Append {
            token: key.to_string(),
            continue_with_result,
        })
    };
    match key {
        "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" | "." | "(" | ")" => {
            append(false)
        }
        "+" | "-" | "*" | "/" => append(true),
        "=" => Some(Command::Evaluate),
        "<" => Some(Command::Backspace),
        _ => None,
    }
}

/// Whole-line words select the non-key actions; anything else is read one
/// grapheme per key. Unknown keys are skipped and handed back for reporting.
pub fn read_line(line: &str) -> (Input, Vec<UnknownKey>) {
    match line.trim() {
        "c" | "clear" => return (Input::Keys(vec![Command::Clear]), Vec::new()),
        "back" => return (Input::Keys(vec![Command::Backspace]), Vec::new()),
        "history" => return (Input::History, Vec::new()),
        "q" | "quit" | "exit" => return (Input::Quit, Vec::new()),
        _ => {}
    }

    let mut commands = Vec::new();
    let mut unknown = Vec::new();
    for key in line.graphemes(true) {
        if key.trim().is_empty() {
            continue;
        }
        match command_for(key) {
            Some(command) => commands.push(command),
            None => unknown.push(UnknownKey(key.to_string())),
        }
    }
    (Input::Keys(commands), unknown)
}
