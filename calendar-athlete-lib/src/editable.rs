//src/editable.rs

/// A value that renders as text and switches to an input on activation.
///
/// The field never interprets what is typed; `commit` hands the raw draft to
/// the caller's save callback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditableField {
    value: String,
    draft: Option<String>,
    disabled: bool,
}

impl EditableField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            draft: None,
            disabled: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Text to render: the draft while editing, the value otherwise.
    pub fn display(&self) -> &str {
        self.draft.as_deref().unwrap_or(&self.value)
    }

    pub const fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.draft = None;
        }
    }

    /// Re-syncs the displayed value with canonical state. Ignored while editing.
    pub fn set_value(&mut self, value: impl Into<String>) {
        if !self.is_editing() {
            self.value = value.into();
        }
    }

    /// Enters edit mode. Returns `false` when the field is disabled.
    pub fn activate(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        if self.draft.is_none() {
            self.draft = Some(self.value.clone());
        }
        true
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(draft) = self.draft.as_mut() {
            draft.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.pop();
        }
    }

    pub fn clear(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.clear();
        }
    }

    /// Leaves edit mode, shows the draft as the new value and passes it to
    /// `on_save`. Returns `None` (without calling `on_save`) when not editing.
    pub fn commit<R>(&mut self, on_save: impl FnOnce(&str) -> R) -> Option<R> {
        let draft = self.draft.take()?;
        self.value = draft;
        Some(on_save(&self.value))
    }

    /// Leaves edit mode without saving.
    pub fn cancel(&mut self) {
        self.draft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_passes_raw_draft_and_shows_it() {
        let mut field = EditableField::new("10");
        assert!(field.activate());
        field.backspace();
        field.backspace();
        field.insert_char('1');
        field.insert_char('2');
        field.insert_char('x');
        let saved = field.commit(|v| v.to_string());
        assert_eq!(saved.as_deref(), Some("12x"));
        assert_eq!(field.display(), "12x");
        assert!(!field.is_editing());
    }

    #[test]
    fn cancel_reverts_without_saving() {
        let mut field = EditableField::new("Bench");
        field.activate();
        field.clear();
        field.insert_char('Z');
        field.cancel();
        assert_eq!(field.display(), "Bench");
        let mut called = false;
        assert!(field.commit(|_| called = true).is_none());
        assert!(!called);
    }

    #[test]
    fn disabled_field_cannot_activate() {
        let mut field = EditableField::new("Squat");
        field.set_disabled(true);
        assert!(!field.activate());
        assert!(!field.is_editing());
        field.set_disabled(false);
        assert!(field.activate());
    }
}
