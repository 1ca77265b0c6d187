use crate::clipboard::{ClipboardDelivery, ClipboardOutcome, ClipboardSink, PendingCopy};
use crate::compose::TileComposer;
use crate::error::{ClipboardError, PipelineError};
use crate::loader::ImageLoader;
use outs_core::{
    draw_addon, draw_initial, draw_selected, DeckRegistry, Draw, OutsSet, RngState,
    INITIAL_DRAW_SIZE,
};

/// Result of one draw action that made it through composition.
#[derive(Debug)]
pub struct DrawReport {
    pub draw: Draw,
    pub outcome: ClipboardOutcome,
}

impl DrawReport {
    /// Whether the caller should append `draw.cards` to its outs. Re-copies of
    /// selected cards never do; neither does a failed delivery.
    pub fn commits_outs(&self) -> bool {
        self.draw.reveals_new_cards() && !self.outcome.is_failed()
    }
}

pub struct Pipeline<L, S> {
    deck: DeckRegistry,
    composer: TileComposer<L>,
    delivery: ClipboardDelivery<S>,
    initial_size: usize,
}

impl<L: ImageLoader, S: ClipboardSink> Pipeline<L, S> {
    pub fn new(deck: DeckRegistry, composer: TileComposer<L>, delivery: ClipboardDelivery<S>) -> Self {
        Self {
            deck,
            composer,
            delivery,
            initial_size: INITIAL_DRAW_SIZE,
        }
    }

    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.initial_size = size;
        self
    }

    pub fn delivery(&self) -> &ClipboardDelivery<S> {
        &self.delivery
    }

    pub async fn draw_initial(
        &self,
        outs: &OutsSet,
        rng: &mut RngState,
    ) -> Result<DrawReport, PipelineError> {
        let draw = draw_initial(outs, self.initial_size, rng)?;
        self.copy(draw).await
    }

    pub async fn draw_addon(
        &self,
        outs: &OutsSet,
        rng: &mut RngState,
    ) -> Result<DrawReport, PipelineError> {
        let draw = draw_addon(outs, rng)?;
        self.copy(draw).await
    }

    pub async fn draw_selected(
        &self,
        outs: &OutsSet,
        raw_input: &str,
    ) -> Result<DrawReport, PipelineError> {
        let draw = draw_selected(outs, raw_input)?;
        self.copy(draw).await
    }

    /// Composes the drawn cards and hands the picture to the clipboard.
    pub async fn copy(&self, draw: Draw) -> Result<DrawReport, PipelineError> {
        log::info!("{:?} draw: {:?}", draw.kind, draw.cards);
        let entries = self.deck.entries_for(&draw.cards);
        let image = self.composer.compose(&entries).await?;
        let outcome = self.delivery.deliver(image).await;
        Ok(DrawReport { draw, outcome })
    }

    pub fn confirm(&self, pending: PendingCopy) -> Result<(), ClipboardError> {
        self.delivery.confirm(pending)
    }
}
