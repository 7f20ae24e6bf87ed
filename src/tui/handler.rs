use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::discover::WizardStep;

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    FocusNext,
    FocusPrev,
    Select,
    Back,
    New,
    Delete,
    Rename,
    ToggleChecked,
    ToggleAllChecked,
    Download,
    Upload,
    Discover,
    AddParagraph,
    StartChatInput,
    ShowHelp,
    HideHelp,
    // Chat input actions
    ChatInputChar(char),
    ChatInputBackspace,
    ChatInputConfirm,
    ChatInputCancel,
    // Modal prompt actions
    PromptChar(char),
    PromptBackspace,
    PromptConfirm,
    PromptCancel,
    // Discover wizard: topic step
    TopicChar(char),
    TopicBackspace,
    TopicConfirm,
    TopicCancel,
    // Discover wizard: results step
    WizardUp,
    WizardDown,
    WizardToggle,
    WizardToggleAll,
    WizardConfirm,
    WizardBack,
}

pub fn handle_key_event(
    key: KeyEvent,
    prompt_active: bool,
    chat_input_active: bool,
    wizard_step: Option<WizardStep>,
    show_help: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Modal prompt mode
    if prompt_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::PromptConfirm),
            KeyCode::Esc => Some(AppAction::PromptCancel),
            KeyCode::Backspace => Some(AppAction::PromptBackspace),
            KeyCode::Char(c) => Some(AppAction::PromptChar(c)),
            _ => None,
        };
    }

    // Discover wizard modes
    match wizard_step {
        Some(WizardStep::Topic) => {
            return match key.code {
                KeyCode::Enter => Some(AppAction::TopicConfirm),
                KeyCode::Esc => Some(AppAction::TopicCancel),
                KeyCode::Backspace => Some(AppAction::TopicBackspace),
                KeyCode::Char(c) => Some(AppAction::TopicChar(c)),
                _ => None,
            };
        }
        Some(WizardStep::Results) => {
            return match key.code {
                KeyCode::Enter => Some(AppAction::WizardConfirm),
                KeyCode::Esc => Some(AppAction::WizardBack),
                KeyCode::Char('j') | KeyCode::Down => Some(AppAction::WizardDown),
                KeyCode::Char('k') | KeyCode::Up => Some(AppAction::WizardUp),
                KeyCode::Char(' ') => Some(AppAction::WizardToggle),
                KeyCode::Char('a') => Some(AppAction::WizardToggleAll),
                _ => None,
            };
        }
        None => {}
    }

    // Chat input mode
    if chat_input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::ChatInputConfirm),
            KeyCode::Esc => Some(AppAction::ChatInputCancel),
            KeyCode::Backspace => Some(AppAction::ChatInputBackspace),
            KeyCode::Char(c) => Some(AppAction::ChatInputChar(c)),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Tab, _) => Some(AppAction::FocusNext),
        (KeyCode::BackTab, _) => Some(AppAction::FocusPrev),

        (KeyCode::Enter, _) => Some(AppAction::Select),
        (KeyCode::Esc, _) => Some(AppAction::Back),

        (KeyCode::Char('n'), _) => Some(AppAction::New),
        (KeyCode::Char('d'), _) => Some(AppAction::Delete),
        (KeyCode::Char('r'), _) => Some(AppAction::Rename),

        (KeyCode::Char(' '), _) => Some(AppAction::ToggleChecked),
        (KeyCode::Char('a'), _) => Some(AppAction::ToggleAllChecked),
        (KeyCode::Char('o'), _) => Some(AppAction::Download),
        (KeyCode::Char('u'), _) => Some(AppAction::Upload),
        (KeyCode::Char('s'), _) => Some(AppAction::Discover),
        (KeyCode::Char('p'), _) => Some(AppAction::AddParagraph),
        (KeyCode::Char('i'), _) => Some(AppAction::StartChatInput),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn prompt_mode_captures_characters() {
        let action = handle_key_event(key(KeyCode::Char('q')), true, false, None, false);
        assert!(matches!(action, Some(AppAction::PromptChar('q'))));
    }

    #[test]
    fn wizard_results_mode_uses_space_to_toggle() {
        let action = handle_key_event(
            key(KeyCode::Char(' ')),
            false,
            false,
            Some(WizardStep::Results),
            false,
        );
        assert!(matches!(action, Some(AppAction::WizardToggle)));
    }

    #[test]
    fn help_swallows_every_key() {
        let action = handle_key_event(key(KeyCode::Char('j')), false, false, None, true);
        assert!(matches!(action, Some(AppAction::HideHelp)));
    }

    #[test]
    fn normal_mode_quits_on_q() {
        let action = handle_key_event(key(KeyCode::Char('q')), false, false, None, false);
        assert!(matches!(action, Some(AppAction::Quit)));
    }
}
