use crate::models::error::CaptureError;
use crate::models::view::CaptureView;

/// Event delegate for the presentation shell.
///
/// All methods are called synchronously from the controller's event handlers.
pub trait CaptureDelegate {
    /// Called after any event that changed what should be rendered.
    fn on_view_changed(&self, view: &CaptureView);

    /// Called with failures the user must see (capture cannot proceed).
    fn on_error(&self, error: &CaptureError);

    /// Called once the widget has closed, with or without a confirmed video.
    fn on_closed(&self);
}
