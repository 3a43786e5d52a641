//! Task form handling for the terminal user interface.
//!
//! The same two-field form backs both the add form on the list screen and the
//! edit modal.

use crate::task::EditDraft;
use crate::tui::input::InputField;

/// Field order for form navigation.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
const FIELD_COUNT: usize = 2;

/// Title and description inputs with a current-field cursor.
#[derive(Clone, Debug, Default)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub current_field: usize,
}

impl TaskForm {
    /// Create an empty form with the title focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a form pre-filled from an edit draft.
    pub fn from_draft(draft: &EditDraft) -> Self {
        Self {
            title: InputField::with_value(&draft.title),
            description: InputField::with_value(&draft.description),
            current_field: TITLE_FIELD,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// The input that currently receives key presses.
    pub fn active_mut(&mut self) -> &mut InputField {
        match self.current_field {
            DESCRIPTION_FIELD => &mut self.description,
            _ => &mut self.title,
        }
    }

    /// Empty both inputs and return focus to the title.
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.current_field = TITLE_FIELD;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;

    #[test]
    fn test_from_draft_prefills_and_focuses_title() {
        let draft = EditDraft {
            task_id: TaskId(2),
            title: "Design".into(),
            description: "Sketch".into(),
        };
        let form = TaskForm::from_draft(&draft);
        assert_eq!(form.title.value, "Design");
        assert_eq!(form.description.value, "Sketch");
        assert_eq!(form.description.cursor, 6);
        assert_eq!(form.current_field, TITLE_FIELD);
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = TaskForm::new();
        form.next_field();
        assert_eq!(form.current_field, DESCRIPTION_FIELD);
        form.next_field();
        assert_eq!(form.current_field, TITLE_FIELD);
        form.prev_field();
        assert_eq!(form.current_field, DESCRIPTION_FIELD);
        form.active_mut().handle_char('x');
        assert_eq!(form.description.value, "x");
        form.clear();
        assert_eq!(form.description.value, "");
        assert_eq!(form.current_field, TITLE_FIELD);
    }
}
