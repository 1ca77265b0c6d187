use crate::locale::UiLocale;
use crate::session::Session;
use outs_core::{DrawError, Notification, RngState};
use outs_render::{
    ClipboardOutcome, ClipboardSink, DrawReport, ImageLoader, PendingCopy, Pipeline,
    PipelineError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawAction {
    Initial,
    Addon,
    Selected(String),
}

pub struct App<L, S> {
    pub locale: UiLocale,
    pub session: Session,
    pipeline: Pipeline<L, S>,
    rng: RngState,
}

impl<L: ImageLoader, S: ClipboardSink> App<L, S> {
    pub fn new(locale: UiLocale, session: Session, pipeline: Pipeline<L, S>, rng: RngState) -> Self {
        Self {
            locale,
            session,
            pipeline,
            rng,
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Runs one draw end to end. A returned [`PendingCopy`] keeps the session
    /// busy until [`App::resolve`] is called with it.
    pub async fn run(&mut self, action: DrawAction) -> Option<PendingCopy> {
        if !self.session.begin() {
            let text = self
                .locale
                .text("Wait for the current copy to finish", "Дождись окончания копирования");
            self.session.notify(Notification::error(text));
            return None;
        }
        let outs = self.session.outs().clone();
        let result = match &action {
            DrawAction::Initial => self.pipeline.draw_initial(&outs, &mut self.rng).await,
            DrawAction::Addon => self.pipeline.draw_addon(&outs, &mut self.rng).await,
            DrawAction::Selected(raw) => self.pipeline.draw_selected(&outs, raw).await,
        };
        match result {
            Ok(report) => self.apply(report),
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }

    /// Finishes a pending copy: `confirmed` performs the write (gesture
    /// platforms), otherwise the preview is just released.
    pub fn resolve(&mut self, pending: PendingCopy, confirmed: bool) {
        if confirmed {
            match self.pipeline.confirm(pending) {
                Ok(()) => self.notify_copied(),
                Err(err) => {
                    log::error!("{err}");
                    self.notify_failure();
                }
            }
        } else {
            pending.dismiss();
        }
        self.session.finish();
    }

    pub fn new_round(&mut self) {
        self.session.new_round();
    }

    fn apply(&mut self, report: DrawReport) -> Option<PendingCopy> {
        if report.commits_outs() {
            self.session.commit(&report.draw);
        }
        if report.draw.is_partial() {
            log::info!(
                "partial draw: {} of {} cards",
                report.draw.cards.len(),
                report.draw.requested
            );
        }
        match report.outcome {
            ClipboardOutcome::Delivered => {
                self.notify_copied();
                self.session.finish();
                None
            }
            ClipboardOutcome::NeedsManualConfirmation(pending) => Some(pending),
            ClipboardOutcome::Failed(err) => {
                log::error!("{err}");
                self.notify_failure();
                self.session.finish();
                None
            }
        }
    }

    fn fail(&mut self, err: &PipelineError) {
        let text = match err {
            PipelineError::Draw(DrawError::DeckExhausted) => {
                self.locale.text("The deck is empty!", "Колода пуста!")
            }
            PipelineError::Draw(DrawError::EmptyInput) => self
                .locale
                .text("List the selected numbers!", "Перечисли выбранные номера!"),
            PipelineError::Draw(DrawError::NotYetOut { .. }) => self
                .locale
                .text("Some numbers are not out yet!", "Некоторые номера ещё не вышли!"),
            PipelineError::Draw(DrawError::TooManyCards { .. }) => self
                .locale
                .text("Too many numbers!", "Слишком много номеров!"),
            PipelineError::Compose(compose) => {
                log::error!("{compose}");
                self.locale.text("Error", "Ошибка")
            }
        };
        self.session.notify(Notification::error(text));
        self.session.finish();
    }

    fn notify_copied(&mut self) {
        let text = self
            .locale
            .text("Cards copied to the clipboard!", "Картинки скопированы в буфер!");
        self.session.notify(Notification::success(text));
    }

    fn notify_failure(&mut self) {
        let text = self.locale.text("Error", "Ошибка");
        self.session.notify(Notification::error(text));
    }
}
