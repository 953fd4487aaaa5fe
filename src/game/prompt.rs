use serde::{Deserialize, Serialize};

use crate::game::behavior::GameError;

/// 선택지를 고르면 일어날 일
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptAction {
    StartNormal,
    StartEndless,
    /// 스테이지 시작 스냅샷으로 재도전
    Continue,
    ReturnToTitle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub action: PromptAction,
}

/// 버튼 N 개 중 하나를 고르는 화면
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicePrompt {
    pub title: String,
    pub options: Vec<ChoiceOption>,
}

impl ChoicePrompt {
    pub fn new(title: impl Into<String>, options: Vec<(&str, PromptAction)>) -> Self {
        Self {
            title: title.into(),
            options: options
                .into_iter()
                .map(|(label, action)| ChoiceOption {
                    label: label.to_string(),
                    action,
                })
                .collect(),
        }
    }

    pub fn title_screen() -> Self {
        Self::new(
            "Forest Explorer",
            vec![
                ("Start", PromptAction::StartNormal),
                ("Endless", PromptAction::StartEndless),
            ],
        )
    }

    pub fn game_over() -> Self {
        Self::new(
            "Game Over",
            vec![
                ("Continue", PromptAction::Continue),
                ("Title", PromptAction::ReturnToTitle),
            ],
        )
    }

    pub fn game_clear() -> Self {
        Self::new("Game Clear", vec![("Title", PromptAction::ReturnToTitle)])
    }

    pub fn choose(&self, index: usize) -> Result<PromptAction, GameError> {
        self.options
            .get(index)
            .map(|option| option.action)
            .ok_or(GameError::InvalidAction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screens_are_plain_data() {
        assert_eq!(ChoicePrompt::title_screen().choose(1), Ok(PromptAction::StartEndless));
        assert_eq!(ChoicePrompt::game_over().choose(0), Ok(PromptAction::Continue));
        assert_eq!(ChoicePrompt::game_clear().options.len(), 1);
        assert_eq!(ChoicePrompt::game_clear().choose(1), Err(GameError::InvalidAction));
    }
}
