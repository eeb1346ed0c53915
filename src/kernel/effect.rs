use crate::kernel::services::ports::{BridgeRequest, ConfirmPrompt, FileProperties, Notification};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send to the storage side.
    Request(BridgeRequest),
    /// The active buffer changed: restart the dirty and preview debounces.
    ContentEdited,
    /// A different document is now visible: relabel and re-render the preview.
    Activated,
    RefreshTabs,
    RefreshTree,
    Confirm(ConfirmPrompt),
    Notify(Notification),
    ShowProperties(FileProperties),
}
