//! Presentation capability used by the exchange controller.

use crate::turn::Turn;

/// A surface that can display turns and the composing indicator.
///
/// Rendering has no failure path. Implementations scroll to the newest
/// element after every call that adds one.
pub trait Renderer {
    /// Append a display element for `turn`.
    fn render_turn(&mut self, turn: &Turn);

    /// Append one transient "responder is composing" element.
    ///
    /// Not idempotent: calling twice shows two indicators.
    fn show_composing_indicator(&mut self);

    /// Remove the first composing indicator, if any.
    fn hide_composing_indicator(&mut self);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render_turn(&mut self, turn: &Turn) {
        (**self).render_turn(turn);
    }

    fn show_composing_indicator(&mut self) {
        (**self).show_composing_indicator();
    }

    fn hide_composing_indicator(&mut self) {
        (**self).hide_composing_indicator();
    }
}
