use tokio::sync::mpsc;

/// User-facing status line entries. Failed mutations surface here
/// instead of propagating; the UI drains them each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct NoticeSender {
    tx: mpsc::UnboundedSender<Notice>,
}

pub fn channel() -> (NoticeSender, mpsc::UnboundedReceiver<Notice>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NoticeSender { tx }, rx)
}

impl NoticeSender {
    pub fn info(&self, text: impl Into<String>) {
        self.send(NoticeLevel::Info, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.send(NoticeLevel::Error, text.into());
    }

    fn send(&self, level: NoticeLevel, text: String) {
        // The receiver only goes away on shutdown; dropping the notice
        // then is fine.
        let _ = self.tx.send(Notice { level, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_arrive_in_order() {
        let (tx, mut rx) = channel();
        tx.error("first");
        tx.info("second");
        let first = rx.try_recv().unwrap();
        assert_eq!(first.level, NoticeLevel::Error);
        assert_eq!(first.text, "first");
        assert_eq!(rx.try_recv().unwrap().text, "second");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sending_without_a_receiver_does_not_panic() {
        let (tx, rx) = channel();
        drop(rx);
        tx.error("nobody listening");
    }
}
