//! Modal dialog requests
//!
//! Running a modal dialog is the one blocking operation in tkshim: the host
//! spins its own nested loop and returns the user's answer synchronously. No
//! other application callback runs while the dialog is up.

use std::path::PathBuf;

/// Icon / severity of a message box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MessageKind {
    #[default]
    Info,
    Warning,
    Error,
    Question,
}

/// Button set of a message box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MessageButtons {
    #[default]
    Ok,
    OkCancel,
    YesNo,
    YesNoCancel,
}

/// What a file chooser selects
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FileAction {
    #[default]
    Open,
    Save,
    SelectFolder,
}

/// A dialog to run modally
#[derive(Clone, Debug, PartialEq)]
pub enum ModalRequest {
    Message {
        kind: MessageKind,
        buttons: MessageButtons,
        title: String,
        message: String,
    },
    File {
        action: FileAction,
        title: String,
    },
    Color {
        title: String,
        initial: Option<String>,
    },
}

/// Answer from a modal dialog
#[derive(Clone, Debug, PartialEq)]
pub enum ModalResponse {
    Ok,
    Yes,
    No,
    Cancel,
    /// Chosen path (file dialogs)
    Path(PathBuf),
    /// Chosen color as `#rrggbb` (color dialogs)
    Color(String),
}
