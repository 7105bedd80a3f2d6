//! User-visible failure and warning messages.

use std::fmt;

use tokio::sync::mpsc;
use tracing::warn;

use crate::ports::Notifier;

/// The conditions a user is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    AddFailed,
    StockExceeded,
    RemoveFailed,
    UpdateFailed,
}

impl NoticeKind {
    pub fn default_message(self) -> &'static str {
        match self {
            NoticeKind::AddFailed => "Error adding product",
            NoticeKind::StockExceeded => "Requested quantity out of stock",
            NoticeKind::RemoveFailed => "Error removing product",
            NoticeKind::UpdateFailed => "Error changing product amount",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoticeKind::AddFailed => "add_failed",
            NoticeKind::StockExceeded => "stock_exceeded",
            NoticeKind::RemoveFailed => "remove_failed",
            NoticeKind::UpdateFailed => "update_failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
        }
    }
}

/// Writes every notice to the log. Used when nothing else displays them.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        warn!(kind = %notice.kind, message = %notice.message, "Cart notice");
    }
}

/// Forwards notices to a channel a UI can drain at its own pace.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        // Nobody listening is fine.
        let _ = self.sender.send(notice);
    }
}
