use record_confirm_common::RecordForm;

/// The displayed record plus the text the user is typing.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub form: Option<RecordForm>,
    pub confirmed_identifier: String,
    pub confirmed_results: String,
}

impl FormState {
    /// Replace the form and reseed both edit fields from it.
    pub fn show(&mut self, form: RecordForm) {
        self.confirmed_identifier = form.confirmed_identifier.clone();
        self.confirmed_results = form.confirmed_results.clone();
        self.form = Some(form);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn index(&self) -> Option<usize> {
        self.form.as_ref().map(|f| f.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
}

/// Message the user has to dismiss before continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }
}
