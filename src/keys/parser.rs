use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::{CalendarError, Result};

/// Parses a binding such as `Ctrl+q`, `Shift+Tab`, `F5` or `Ctrl++`.
///
/// `Shift+<letter>` is stored as the upper-case letter, which is what the
/// terminal reports for it.
pub fn parse_key(input: &str) -> Result<KeyEvent> {
    let (mut modifiers, key_str) = split_modifiers(input.trim())?;
    if key_str.is_empty() {
        return Err(CalendarError::Config(format!(
            "No key code found in '{}'",
            input
        )));
    }

    let mut code = parse_key_code(key_str)?;
    if let KeyCode::Char(c) = code {
        if c.is_ascii_alphabetic() && modifiers.contains(KeyModifiers::SHIFT) {
            code = KeyCode::Char(c.to_ascii_uppercase());
            modifiers.remove(KeyModifiers::SHIFT);
        }
    }

    Ok(KeyEvent::new(code, modifiers))
}

/// Peels `Mod+` prefixes off `input`. A trailing `+` is the key itself.
fn split_modifiers(input: &str) -> Result<(KeyModifiers, &str)> {
    let mut modifiers = KeyModifiers::NONE;
    let mut rest = input;
    while let Some((head, tail)) = rest.split_once('+') {
        if tail.is_empty() {
            break;
        }
        modifiers |= match head.trim().to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" | "meta" => KeyModifiers::ALT,
            _ => {
                return Err(CalendarError::Config(format!(
                    "Unknown modifier '{}' in key '{}'",
                    head.trim(),
                    input
                )))
            }
        };
        rest = tail;
    }
    Ok((modifiers, rest.trim()))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    let lower = s.to_lowercase();
    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" | "bs" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" | "↑" => KeyCode::Up,
        "down" | "↓" => KeyCode::Down,
        "left" | "←" => KeyCode::Left,
        "right" | "→" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        "plus" => KeyCode::Char('+'),
        "minus" => KeyCode::Char('-'),
        f if f.len() > 1 && f.starts_with('f') => KeyCode::F(parse_function_key(f)?),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(CalendarError::Config(format!("Unknown key: {}", s))),
            }
        }
    };
    Ok(code)
}

fn parse_function_key(s: &str) -> Result<u8> {
    let num: u8 = s[1..]
        .parse()
        .map_err(|_| CalendarError::Config(format!("Invalid function key: {}", s)))?;
    if !(1..=12).contains(&num) {
        return Err(CalendarError::Config(format!(
            "Function key out of range: F{}",
            num
        )));
    }
    Ok(num)
}
