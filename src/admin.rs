//! GUI admin front end built on egui/eframe.
//!
//! A single window: template catalog in a sidebar, the editor form in
//! the center, composition preview and the journal in floating windows.
//! The form's field visibility is driven by the same
//! [`VisibilityController`](crate::form::VisibilityController) the
//! console front end uses, wired to sliding panel regions.

pub mod app;
pub mod widgets;

pub use app::AdminApp;

use anyhow::{anyhow, Result};

use crate::settings::AppSettings;
use crate::template::registry::TemplateCatalog;

/// Open the admin window. Blocks until it is closed.
pub fn run_admin(settings: AppSettings, catalog: TemplateCatalog) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mailsmith - Email Templates")
            .with_inner_size([1080.0, 760.0])
            .with_min_inner_size([840.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mailsmith",
        native_options,
        Box::new(move |_cc| Ok(Box::new(AdminApp::new(settings, catalog)))),
    )
    .map_err(|err| anyhow!("admin window error: {err}"))
}
