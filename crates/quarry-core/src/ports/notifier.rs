//! User-facing notification port.

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Success,
    Error,
}

/// Fire-and-forget notification channel (in-game chat in the reference
/// host). No acknowledgment, must not fail.
///
/// Design note: the original shared this behavior through a default-method
/// mixin on every class; here it is a narrow injected capability instead.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: Notice, text: &str);

    fn info(&self, text: &str) {
        self.notify(Notice::Info, text);
    }

    fn success(&self, text: &str) {
        self.notify(Notice::Success, text);
    }

    fn error(&self, text: &str) {
        self.notify(Notice::Error, text);
    }
}
