//! Form dialog lifecycle:
//! closed -> open (prefilled when editing) -> submitting -> closed on
//! success, or back to open with an error toast on failure.

use crate::error::CoreError;
use crate::notify::Toast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogPhase {
    Closed,
    Open,
    Submitting,
}

impl DialogPhase {
    fn name(self) -> &'static str {
        match self {
            DialogPhase::Closed => "closed",
            DialogPhase::Open => "open",
            DialogPhase::Submitting => "submitting",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dialog<D> {
    phase: DialogPhase,
    draft: D,
    /// Id of the record being edited; `None` when creating.
    editing: Option<String>,
    last_error: Option<String>,
}

impl<D: Clone + Default> Default for Dialog<D> {
    fn default() -> Self {
        Self {
            phase: DialogPhase::Closed,
            draft: D::default(),
            editing: None,
            last_error: None,
        }
    }
}

impl<D: Clone + Default> Dialog<D> {
    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Submit control is enabled only while open.
    pub fn can_submit(&self) -> bool {
        self.phase == DialogPhase::Open
    }

    pub fn open_new(&mut self) {
        self.open_with(None, D::default());
    }

    pub fn open_edit(&mut self, id: impl Into<String>, draft: D) {
        self.open_with(Some(id.into()), draft);
    }

    fn open_with(&mut self, editing: Option<String>, draft: D) {
        self.phase = DialogPhase::Open;
        self.editing = editing;
        self.draft = draft;
        self.last_error = None;
    }

    /// Draft edits are ignored unless the dialog is open.
    pub fn edit(&mut self, f: impl FnOnce(&mut D)) {
        if self.phase == DialogPhase::Open {
            f(&mut self.draft);
        }
    }

    /// Moves to submitting and hands back the draft to send. A second
    /// submit while one is in flight is rejected.
    pub fn begin_submit(&mut self) -> Result<D, CoreError> {
        if self.phase != DialogPhase::Open {
            return Err(CoreError::InvalidTransition(self.phase.name(), "submit"));
        }
        self.phase = DialogPhase::Submitting;
        self.last_error = None;
        Ok(self.draft.clone())
    }

    pub fn succeed(&mut self, message: impl Into<String>) -> Result<Toast, CoreError> {
        if self.phase != DialogPhase::Submitting {
            return Err(CoreError::InvalidTransition(self.phase.name(), "succeed"));
        }
        *self = Self::default();
        Ok(Toast::success(message))
    }

    /// Returns to open with the draft intact so the user can retry.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<Toast, CoreError> {
        if self.phase != DialogPhase::Submitting {
            return Err(CoreError::InvalidTransition(self.phase.name(), "fail"));
        }
        let message = message.into();
        self.phase = DialogPhase::Open;
        self.last_error = Some(message.clone());
        Ok(Toast::error(message))
    }

    /// Cancelling is not allowed mid-submission.
    pub fn close(&mut self) -> Result<(), CoreError> {
        if self.phase == DialogPhase::Submitting {
            return Err(CoreError::InvalidTransition(self.phase.name(), "close"));
        }
        *self = Self::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastKind;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Draft {
        note: String,
    }

    #[test]
    fn happy_path_closes_on_success() {
        let mut dialog = Dialog::<Draft>::default();
        assert!(!dialog.is_open());
        dialog.open_new();
        dialog.edit(|d| d.note = "hello".into());
        let sent = dialog.begin_submit().unwrap();
        assert_eq!(sent.note, "hello");
        assert!(!dialog.can_submit());
        let toast = dialog.succeed("Saved").unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(dialog.phase(), DialogPhase::Closed);
        assert_eq!(dialog.draft(), &Draft::default());
    }

    #[test]
    fn failure_keeps_dialog_open_with_draft() {
        let mut dialog = Dialog::<Draft>::default();
        dialog.open_edit("rec-1", Draft { note: "prefilled".into() });
        assert_eq!(dialog.editing(), Some("rec-1"));
        dialog.begin_submit().unwrap();
        let toast = dialog.fail("500 Internal Server Error").unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(dialog.phase(), DialogPhase::Open);
        assert_eq!(dialog.draft().note, "prefilled");
        assert_eq!(dialog.last_error(), Some("500 Internal Server Error"));
        assert!(dialog.can_submit());
    }

    #[test]
    fn double_submit_is_rejected() {
        let mut dialog = Dialog::<Draft>::default();
        dialog.open_new();
        dialog.begin_submit().unwrap();
        assert_eq!(
            dialog.begin_submit(),
            Err(CoreError::InvalidTransition("submitting", "submit"))
        );
        assert!(dialog.close().is_err());
    }

    #[test]
    fn edits_while_closed_are_ignored() {
        let mut dialog = Dialog::<Draft>::default();
        dialog.edit(|d| d.note = "lost".into());
        assert_eq!(dialog.draft().note, "");
        assert!(dialog.begin_submit().is_err());
    }
}
