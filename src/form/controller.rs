//! The form visibility controller.

use tracing::debug;

use super::handles::{CheckboxHandle, RegionHandle, SelectorHandle};
use super::visibility::FieldLayout;

/// Applies the field visibility rules to the hosting form.
///
/// The host constructs the controller once at startup, passing the
/// element handles it materialized, then calls [`apply`](Self::apply)
/// with `animate = false` to establish the initial layout and again with
/// `animate = true` from every change event on the selector or the
/// checkbox.
///
/// Region handles are optional: a region the host never materialized is
/// skipped silently, the same way a selector that matches nothing would
/// be. The two input handles are required, since without them there is
/// nothing to evaluate.
pub struct VisibilityController {
    selector: Box<dyn SelectorHandle>,
    autogenerate: Box<dyn CheckboxHandle>,
    body_text: Option<Box<dyn RegionHandle>>,
    body_html: Option<Box<dyn RegionHandle>>,
    autogenerate_row: Option<Box<dyn RegionHandle>>,
}

impl VisibilityController {
    pub fn new(
        selector: Box<dyn SelectorHandle>,
        autogenerate: Box<dyn CheckboxHandle>,
        body_text: Option<Box<dyn RegionHandle>>,
        body_html: Option<Box<dyn RegionHandle>>,
        autogenerate_row: Option<Box<dyn RegionHandle>>,
    ) -> Self {
        Self {
            selector,
            autogenerate,
            body_text,
            body_html,
            autogenerate_row,
        }
    }

    /// Re-read the form inputs and push visibility to the three regions.
    ///
    /// Runs synchronously to completion; the controller keeps no state
    /// between calls, so applying twice with unchanged inputs lands in
    /// the same layout.
    pub fn apply(&mut self, animate: bool) {
        let content_type = self.selector.value();
        let layout = FieldLayout::resolve(&content_type, self.autogenerate.is_checked());
        debug!(
            content_type = %content_type,
            animate,
            body_text = layout.body_text,
            body_html = layout.body_html,
            "applying field layout"
        );

        if let Some(region) = self.body_text.as_mut() {
            region.set_visible(layout.body_text, animate);
        }
        if let Some(region) = self.body_html.as_mut() {
            region.set_visible(layout.body_html, animate);
        }
        if let Some(region) = self.autogenerate_row.as_mut() {
            region.set_visible(layout.autogenerate, animate);
        }
    }
}
