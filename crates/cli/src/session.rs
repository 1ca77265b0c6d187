use crate::persistence::{restore_outs, save_outs_file};
use outs_core::{Draw, Notification, NotificationSlots, OutsSet};
use std::path::PathBuf;

/// Front-end state for one user: the round's outs, the busy flag guarding
/// overlapping draws, and the notification banner.
#[derive(Debug, Default)]
pub struct Session {
    outs: OutsSet,
    busy: bool,
    notices: NotificationSlots,
    store: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose outs are saved to `path` after every change.
    pub fn persistent(path: PathBuf) -> Result<Self, String> {
        let outs = restore_outs(&path)?;
        log::info!("restored {} outs from {}", outs.len(), path.display());
        Ok(Self {
            outs,
            store: Some(path),
            ..Self::default()
        })
    }

    pub fn outs(&self) -> &OutsSet {
        &self.outs
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Claims the busy flag. False when a draw is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn finish(&mut self) {
        self.busy = false;
    }

    pub fn commit(&mut self, draw: &Draw) {
        self.outs.append(draw.cards.iter().copied());
        self.persist();
    }

    pub fn new_round(&mut self) {
        self.outs.clear();
        self.persist();
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notices.show(notification);
    }

    pub fn notices(&self) -> &NotificationSlots {
        &self.notices
    }

    /// Takes the open notification, if any, leaving it as the last shown.
    pub fn take_notice(&mut self) -> Option<Notification> {
        let current = self.notices.current().cloned();
        self.notices.clear();
        current
    }

    fn persist(&self) {
        let Some(path) = self.store.as_ref() else {
            return;
        };
        if let Err(err) = save_outs_file(&self.outs, path) {
            log::warn!("failed to save outs to {}: {err}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outs_core::{CardIndex, DrawKind};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn draw(values: &[u64]) -> Draw {
        Draw {
            kind: DrawKind::Initial,
            cards: values
                .iter()
                .map(|value| CardIndex::new(*value).expect("index"))
                .collect(),
            requested: values.len(),
        }
    }

    #[test]
    fn busy_flag_blocks_second_draw() {
        let mut session = Session::new();
        assert!(session.begin());
        assert!(!session.begin());
        session.finish();
        assert!(session.begin());
    }

    #[test]
    fn notice_is_taken_once_but_stays_displayed() {
        let mut session = Session::new();
        session.notify(Notification::success("copied"));
        assert_eq!(session.take_notice(), Some(Notification::success("copied")));
        assert_eq!(session.take_notice(), None);
        assert_eq!(session.notices().display().text, "copied");
    }

    #[test]
    fn persistent_session_survives_restart() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "outs_cli_session_test_{}_{}.json",
            std::process::id(),
            nanos
        ));
        let mut session = Session::persistent(path.clone()).expect("session");
        assert!(session.outs().is_empty());
        session.commit(&draw(&[3, 14, 15]));

        let restored = Session::persistent(path.clone()).expect("restore");
        assert_eq!(restored.outs().len(), 3);

        let mut restored = restored;
        restored.new_round();
        let cleared = Session::persistent(path.clone()).expect("restore");
        assert!(cleared.outs().is_empty());
        let _ = std::fs::remove_file(path);
    }
}
