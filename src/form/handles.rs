//! Element handles injected into the visibility controller.
//!
//! The controller never looks elements up by identifier. The hosting
//! front end hands it one handle per element it reads or toggles, so the
//! same behavior runs against egui panels, console output, or recording
//! fakes in tests.
//!
//! Note: all handles are owned by the controller. Hosts that need to see
//! the same state share it through `Rc<RefCell<_>>` cells; everything
//! runs on the UI thread, so no locking is involved.

use std::cell::RefCell;
use std::rc::Rc;

/// Read access to the content-type selector's current value.
pub trait SelectorHandle {
    /// Current selector value, a MIME string such as `"text/html"`.
    fn value(&self) -> String;
}

/// Read access to the autogenerate-text checkbox.
pub trait CheckboxHandle {
    fn is_checked(&self) -> bool;
}

/// Write access to one collapsible form region.
pub trait RegionHandle {
    /// Show or hide the region.
    ///
    /// `animate` selects a smooth slide rather than an instant change.
    /// It never affects the resulting visible state, only how the host
    /// renders the transition.
    fn set_visible(&mut self, visible: bool, animate: bool);
}

/// Form inputs shared between a host's widgets and the controller.
///
/// Both front ends keep the selector value and checkbox state in one of
/// these cells: their widgets write it, the controller reads it through
/// [`SharedSelector`] and [`SharedCheckbox`].
#[derive(Debug, Default)]
pub struct SharedInputs {
    pub content_type: String,
    pub autogenerate_text: bool,
}

/// Selector handle reading from a shared input cell.
pub struct SharedSelector(pub Rc<RefCell<SharedInputs>>);

impl SelectorHandle for SharedSelector {
    fn value(&self) -> String {
        self.0.borrow().content_type.clone()
    }
}

/// Checkbox handle reading from a shared input cell.
pub struct SharedCheckbox(pub Rc<RefCell<SharedInputs>>);

impl CheckboxHandle for SharedCheckbox {
    fn is_checked(&self) -> bool {
        self.0.borrow().autogenerate_text
    }
}
