#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeKind {
    #[default]
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Open/closed notification plus the last message shown. A closing banner
/// keeps rendering `last_shown` after `current` is cleared.
#[derive(Debug, Clone, Default)]
pub struct NotificationSlots {
    current: Option<Notification>,
    last_shown: Notification,
}

impl NotificationSlots {
    pub fn show(&mut self, notification: Notification) {
        self.last_shown = notification.clone();
        self.current = Some(notification);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn display(&self) -> &Notification {
        &self.last_shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_survives_clear() {
        let mut slots = NotificationSlots::default();
        slots.show(Notification::error("deck is empty"));
        slots.clear();
        assert!(!slots.is_open());
        assert_eq!(slots.display(), &Notification::error("deck is empty"));
    }

    #[test]
    fn newer_notification_replaces_last_shown() {
        let mut slots = NotificationSlots::default();
        slots.show(Notification::error("failed"));
        slots.show(Notification::success("copied"));
        assert_eq!(slots.current().map(|n| n.kind), Some(NoticeKind::Success));
        assert_eq!(slots.display().text, "copied");
    }
}
