use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    NextSymbol,
    PrevSymbol,
    FirstSymbol,
    LastSymbol,
}

pub fn parse_key(key: &KeyEvent) -> Option<UiCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(UiCommand::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Right | KeyCode::Down | KeyCode::Tab => Some(UiCommand::NextSymbol),
        KeyCode::Left | KeyCode::Up | KeyCode::BackTab => Some(UiCommand::PrevSymbol),
        KeyCode::Home => Some(UiCommand::FirstSymbol),
        KeyCode::End => Some(UiCommand::LastSymbol),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'j' | 'l' => Some(UiCommand::NextSymbol),
            'k' | 'h' => Some(UiCommand::PrevSymbol),
            'g' => Some(UiCommand::FirstSymbol),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(parse_key(&key(KeyCode::Right)), Some(UiCommand::NextSymbol));
        assert_eq!(parse_key(&key(KeyCode::Char('k'))), Some(UiCommand::PrevSymbol));
        assert_eq!(parse_key(&key(KeyCode::End)), Some(UiCommand::LastSymbol));
        assert_eq!(parse_key(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(parse_key(&key(KeyCode::Char('Q'))), Some(UiCommand::Quit));
        assert_eq!(
            parse_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(UiCommand::Quit)
        );
        assert_eq!(
            parse_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
    }
}
