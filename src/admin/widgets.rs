//! Sliding form regions for the egui admin.
//!
//! Each managed form region renders through [`region`], which animates
//! its openness toward the target set by the visibility controller. The
//! controller side of the wiring is [`PanelRegion`], a
//! [`RegionHandle`] writing into the shared [`RegionState`] cell.

use std::cell::RefCell;
use std::rc::Rc;

use crate::form::RegionHandle;

/// Seconds a slide transition takes. Instant changes use zero, which
/// snaps egui's animation to the target value.
pub const SLIDE_SECONDS: f32 = 0.2;

/// Render state for one collapsible form region.
#[derive(Debug)]
pub struct RegionState {
    id: egui::Id,
    pub visible: bool,
    /// Whether the pending visibility change should slide.
    pub animate: bool,
    /// Content height remembered from the last fully open frame, used
    /// to clip the body while it slides.
    measured_height: f32,
}

impl RegionState {
    pub fn new(id: impl std::hash::Hash) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            id: egui::Id::new(id),
            visible: true,
            animate: false,
            measured_height: 0.0,
        }))
    }
}

/// Controller-side handle writing into a shared region state.
pub struct PanelRegion(pub Rc<RefCell<RegionState>>);

impl RegionHandle for PanelRegion {
    fn set_visible(&mut self, visible: bool, animate: bool) {
        let mut state = self.0.borrow_mut();
        state.visible = visible;
        state.animate = animate;
    }
}

/// Show a form region, sliding it toward its target visibility.
///
/// A fully closed region renders nothing. Mid-slide, the body is faded
/// and clipped to a fraction of its remembered height.
pub fn region(
    ui: &mut egui::Ui,
    state: &Rc<RefCell<RegionState>>,
    add_contents: impl FnOnce(&mut egui::Ui),
) {
    let (id, visible, animate, remembered) = {
        let s = state.borrow();
        (s.id, s.visible, s.animate, s.measured_height)
    };

    let time = if animate { SLIDE_SECONDS } else { 0.0 };
    let openness = ui.ctx().animate_bool_with_time(id, visible, time);
    if openness <= 0.0 {
        return;
    }

    let inner = ui.scope(|ui| {
        if openness < 1.0 {
            ui.set_opacity(openness);
            if remembered > 0.0 {
                ui.set_max_height(remembered * openness);
                ui.set_clip_rect(ui.max_rect().intersect(ui.clip_rect()));
            }
            // Keep the slide moving until it settles.
            ui.ctx().request_repaint();
        }
        add_contents(ui);
    });

    if openness >= 1.0 {
        state.borrow_mut().measured_height = inner.response.rect.height();
    }
}
