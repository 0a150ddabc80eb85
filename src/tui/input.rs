use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Move to next image
    Next,
    /// Move to previous image
    Previous,
    /// Move the current image into the bucket with this digit
    Sort(u8),
    /// Open the add-path prompt
    AddPath,
    /// Open the current image in the system viewer
    Open,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Result of a key press while the add-path prompt is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    // Shift is allowed since some terminals report it for '?'
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return KeyAction::None;
    }

    match key.code {
        // Quit: q or Esc
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,

        // Navigation
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('j') | KeyCode::Char(' ') => {
            KeyAction::Next
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('k') => KeyAction::Previous,

        // Buckets
        KeyCode::Char(c @ '0'..='9') => KeyAction::Sort(c as u8 - b'0'),

        KeyCode::Char('a') => KeyAction::AddPath,
        KeyCode::Char('o') => KeyAction::Open,
        KeyCode::Char('?') => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events while the add-path prompt is open
pub fn handle_prompt_input(key: KeyEvent) -> PromptAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return PromptAction::Cancel;
    }

    match key.code {
        KeyCode::Enter => PromptAction::Submit,
        KeyCode::Esc => PromptAction::Cancel,
        KeyCode::Backspace => PromptAction::Backspace,
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            PromptAction::Insert(c)
        }
        _ => PromptAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_quit() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_key_navigation() {
        for code in [
            KeyCode::Right,
            KeyCode::Char('l'),
            KeyCode::Char('j'),
            KeyCode::Char(' '),
        ] {
            assert_eq!(handle_key_event(key(code)), KeyAction::Next);
        }
        for code in [KeyCode::Left, KeyCode::Char('h'), KeyCode::Char('k')] {
            assert_eq!(handle_key_event(key(code)), KeyAction::Previous);
        }
    }

    #[test]
    fn test_digit_keys_sort() {
        assert_eq!(handle_key_event(key(KeyCode::Char('0'))), KeyAction::Sort(0));
        assert_eq!(handle_key_event(key(KeyCode::Char('5'))), KeyAction::Sort(5));
        assert_eq!(handle_key_event(key(KeyCode::Char('9'))), KeyAction::Sort(9));
    }

    #[test]
    fn test_key_commands() {
        assert_eq!(handle_key_event(key(KeyCode::Char('a'))), KeyAction::AddPath);
        assert_eq!(handle_key_event(key(KeyCode::Char('o'))), KeyAction::Open);
        assert_eq!(handle_key_event(key(KeyCode::Char('?'))), KeyAction::Help);

        let shifted = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(shifted), KeyAction::Help);
    }

    #[test]
    fn test_key_none() {
        assert_eq!(handle_key_event(key(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(handle_key_event(key(KeyCode::Up)), KeyAction::None);

        let alt_digit = KeyEvent::new(KeyCode::Char('3'), KeyModifiers::ALT);
        assert_eq!(handle_key_event(alt_digit), KeyAction::None);
    }

    #[test]
    fn test_prompt_keys() {
        assert_eq!(
            handle_prompt_input(key(KeyCode::Char('/'))),
            PromptAction::Insert('/')
        );
        assert_eq!(
            handle_prompt_input(key(KeyCode::Char('q'))),
            PromptAction::Insert('q')
        );
        assert_eq!(handle_prompt_input(key(KeyCode::Enter)), PromptAction::Submit);
        assert_eq!(handle_prompt_input(key(KeyCode::Esc)), PromptAction::Cancel);
        assert_eq!(
            handle_prompt_input(key(KeyCode::Backspace)),
            PromptAction::Backspace
        );
        assert_eq!(handle_prompt_input(key(KeyCode::Tab)), PromptAction::None);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_prompt_input(ctrl_c), PromptAction::Cancel);
    }
}
