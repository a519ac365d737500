//! Modal dialogs
//!
//! Message boxes, file choosers and the color chooser. Each call blocks until
//! the host dialog is dismissed and returns the user's choice.

use std::path::PathBuf;

use tkshim_platform::{FileAction, MessageButtons, MessageKind, ModalRequest, ModalResponse};

use crate::context::AppContext;

/// Button the user picked in a message box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogAnswer {
    Ok,
    Yes,
    No,
    Cancel,
}

impl DialogAnswer {
    /// Lowercase name, as Tk reports it
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogAnswer::Ok => "ok",
            DialogAnswer::Yes => "yes",
            DialogAnswer::No => "no",
            DialogAnswer::Cancel => "cancel",
        }
    }

    /// Whether the answer confirms (`ok` / `yes`)
    pub fn is_affirmative(&self) -> bool {
        matches!(self, DialogAnswer::Ok | DialogAnswer::Yes)
    }
}

impl std::fmt::Display for DialogAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppContext {
    /// Run a message box and map the host response onto its button set
    ///
    /// Closing the dialog without a button counts as `cancel`, or `ok` when
    /// `ok` is the only button.
    pub fn message_box(
        &self,
        kind: MessageKind,
        buttons: MessageButtons,
        title: &str,
        message: &str,
    ) -> DialogAnswer {
        let request = ModalRequest::Message {
            kind,
            buttons,
            title: title.to_string(),
            message: message.to_string(),
        };
        let response = self.toolkit().run_modal(&request);
        let answer = match (buttons, response) {
            (MessageButtons::Ok, _) => DialogAnswer::Ok,
            (_, ModalResponse::Ok) => DialogAnswer::Ok,
            (_, ModalResponse::Yes) => DialogAnswer::Yes,
            (MessageButtons::YesNo, ModalResponse::No | ModalResponse::Cancel) => DialogAnswer::No,
            (_, ModalResponse::No) => DialogAnswer::No,
            _ => DialogAnswer::Cancel,
        };
        tracing::debug!(?kind, ?buttons, %answer, "message box answered");
        answer
    }

    pub fn show_info(&self, title: &str, message: &str) -> DialogAnswer {
        self.message_box(MessageKind::Info, MessageButtons::Ok, title, message)
    }

    pub fn show_warning(&self, title: &str, message: &str) -> DialogAnswer {
        self.message_box(MessageKind::Warning, MessageButtons::Ok, title, message)
    }

    pub fn show_error(&self, title: &str, message: &str) -> DialogAnswer {
        self.message_box(MessageKind::Error, MessageButtons::Ok, title, message)
    }

    /// `true` only for `yes`
    pub fn ask_yes_no(&self, title: &str, message: &str) -> bool {
        self.message_box(MessageKind::Question, MessageButtons::YesNo, title, message)
            == DialogAnswer::Yes
    }

    /// `true` only for `ok`
    pub fn ask_ok_cancel(&self, title: &str, message: &str) -> bool {
        self.message_box(MessageKind::Question, MessageButtons::OkCancel, title, message)
            == DialogAnswer::Ok
    }

    /// `Some(true)` for yes, `Some(false)` for no, `None` for cancel
    pub fn ask_yes_no_cancel(&self, title: &str, message: &str) -> Option<bool> {
        match self.message_box(MessageKind::Question, MessageButtons::YesNoCancel, title, message)
        {
            DialogAnswer::Yes => Some(true),
            DialogAnswer::No => Some(false),
            _ => None,
        }
    }

    fn choose_path(&self, action: FileAction, title: &str) -> Option<PathBuf> {
        let request = ModalRequest::File {
            action,
            title: title.to_string(),
        };
        match self.toolkit().run_modal(&request) {
            ModalResponse::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Existing file to open; `None` when cancelled
    pub fn ask_open_filename(&self, title: &str) -> Option<PathBuf> {
        self.choose_path(FileAction::Open, title)
    }

    /// File to save to; `None` when cancelled
    pub fn ask_save_as_filename(&self, title: &str) -> Option<PathBuf> {
        self.choose_path(FileAction::Save, title)
    }

    pub fn ask_directory(&self, title: &str) -> Option<PathBuf> {
        self.choose_path(FileAction::SelectFolder, title)
    }

    /// Color as `#rrggbb`; `None` when cancelled
    pub fn ask_color(&self, title: &str, initial: Option<&str>) -> Option<String> {
        let request = ModalRequest::Color {
            title: title.to_string(),
            initial: initial.map(str::to_string),
        };
        match self.toolkit().run_modal(&request) {
            ModalResponse::Color(color) => Some(color),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShimConfig;

    #[test]
    fn test_message_box_records_request() {
        let (ctx, tk) = AppContext::headless(ShimConfig::default());
        assert_eq!(ctx.show_warning("Careful", "Disk almost full"), DialogAnswer::Ok);
        assert_eq!(
            tk.modal_requests(),
            vec![ModalRequest::Message {
                kind: MessageKind::Warning,
                buttons: MessageButtons::Ok,
                title: "Careful".into(),
                message: "Disk almost full".into(),
            }]
        );
    }

    #[test]
    fn test_question_answers() {
        let (ctx, tk) = AppContext::headless(ShimConfig::default());
        tk.push_modal_answer(ModalResponse::Yes);
        assert!(ctx.ask_yes_no("Quit", "Really quit?"));
        // Dismissed without an answer
        assert!(!ctx.ask_yes_no("Quit", "Really quit?"));

        tk.push_modal_answer(ModalResponse::No);
        assert_eq!(ctx.ask_yes_no_cancel("Save", "Save changes?"), Some(false));
        assert_eq!(ctx.ask_yes_no_cancel("Save", "Save changes?"), None);

        tk.push_modal_answer(ModalResponse::Ok);
        assert!(ctx.ask_ok_cancel("Go", "Continue?"));
    }

    #[test]
    fn test_choosers() {
        let (ctx, tk) = AppContext::headless(ShimConfig::default());
        tk.push_modal_answer(ModalResponse::Path("/tmp/report.txt".into()));
        assert_eq!(
            ctx.ask_open_filename("Open"),
            Some(PathBuf::from("/tmp/report.txt"))
        );
        assert_eq!(ctx.ask_directory("Folder"), None);

        tk.push_modal_answer(ModalResponse::Color("#ff8800".into()));
        assert_eq!(ctx.ask_color("Pick", Some("#000000")).as_deref(), Some("#ff8800"));
        assert!(matches!(
            tk.modal_requests().last(),
            Some(ModalRequest::Color { initial: Some(c), .. }) if c == "#000000"
        ));
    }
}
