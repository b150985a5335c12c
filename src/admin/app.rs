//! The admin application: catalog sidebar, editor form, preview, and
//! journal.
//!
//! The editor form owns plain string buffers for everything it edits.
//! The two inputs the visibility rules read (format selector and
//! autogenerate checkbox) live in a shared cell instead, so the
//! [`VisibilityController`] sees exactly what the widgets show. Change
//! events re-apply the rules with a slide; opening a template applies
//! them instantly.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use super::widgets::{self, PanelRegion, RegionState};
use crate::form::visibility::{HTML, PLAIN_TEXT};
use crate::form::{SharedCheckbox, SharedInputs, SharedSelector, VisibilityController};
use crate::journal::{EntryStatus, Journal};
use crate::settings::AppSettings;
use crate::template::compose::{compose, ComposedMessage, Draft};
use crate::template::registry::TemplateCatalog;
use crate::template::render::context_from_pairs;
use crate::template::MessageTemplate;

/// Editable buffers for the open template, except the two visibility
/// inputs, which live in the shared cell the controller reads.
#[derive(Debug, Default)]
struct EditorBuffers {
    name: String,
    scope: Option<String>,
    description: String,
    subject: String,
    body_text: String,
    body_html: String,
    sender: String,
    cc: String,
    bcc: String,
    enabled: bool,
    suppress_log: bool,
}

impl EditorBuffers {
    fn from_template(template: &MessageTemplate) -> Self {
        Self {
            name: template.name.clone(),
            scope: template.scope.clone(),
            description: template.description.clone(),
            subject: template.subject_template.clone(),
            body_text: template.body_template.clone(),
            body_html: template.body_template_html.clone(),
            sender: template.sender.clone().unwrap_or_default(),
            cc: template.base_cc.join(", "),
            bcc: template.base_bcc.join(", "),
            enabled: template.enabled,
            suppress_log: template.suppress_log,
        }
    }

    /// Build a template value from the buffers and the shared inputs.
    fn to_template(&self, inputs: &SharedInputs) -> MessageTemplate {
        let mut template = MessageTemplate::new(self.name.trim());
        template.scope = self.scope.clone();
        template.description = self.description.clone();
        template.content_type = inputs.content_type.clone();
        template.autogenerate_text = inputs.autogenerate_text;
        template.subject_template = self.subject.clone();
        template.body_template = self.body_text.clone();
        template.body_template_html = self.body_html.clone();
        template.sender = match self.sender.trim() {
            "" => None,
            sender => Some(sender.to_string()),
        };
        template.base_cc = split_addresses(&self.cc);
        template.base_bcc = split_addresses(&self.bcc);
        template.enabled = self.enabled;
        template.suppress_log = self.suppress_log;
        template
    }
}

fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct AdminApp {
    settings: AppSettings,
    catalog: TemplateCatalog,
    journal: Journal,
    inputs: Rc<RefCell<SharedInputs>>,
    body_text_region: Rc<RefCell<RegionState>>,
    body_html_region: Rc<RefCell<RegionState>>,
    autogen_region: Rc<RefCell<RegionState>>,
    controller: VisibilityController,
    editor: Option<EditorBuffers>,
    /// Preview context, one `key=value` per line.
    context_text: String,
    preview: Option<Result<ComposedMessage, String>>,
    show_preview: bool,
    show_journal: bool,
    status: String,
}

impl AdminApp {
    pub fn new(settings: AppSettings, catalog: TemplateCatalog) -> Self {
        let inputs = Rc::new(RefCell::new(SharedInputs {
            content_type: PLAIN_TEXT.to_string(),
            autogenerate_text: true,
        }));
        let body_text_region = RegionState::new("region-body-text");
        let body_html_region = RegionState::new("region-body-html");
        let autogen_region = RegionState::new("region-autogenerate");

        let controller = VisibilityController::new(
            Box::new(SharedSelector(inputs.clone())),
            Box::new(SharedCheckbox(inputs.clone())),
            Some(Box::new(PanelRegion(body_text_region.clone()))),
            Some(Box::new(PanelRegion(body_html_region.clone()))),
            Some(Box::new(PanelRegion(autogen_region.clone()))),
        );

        let status = format!("{} templates in the catalog", catalog.len());
        Self {
            settings,
            catalog,
            journal: Journal::new(),
            inputs,
            body_text_region,
            body_html_region,
            autogen_region,
            controller,
            editor: None,
            context_text: String::new(),
            preview: None,
            show_preview: false,
            show_journal: false,
            status,
        }
    }

    fn open_template(&mut self, name: &str, scope: Option<&str>) {
        let Some(template) = self.catalog.get_any(name, scope) else {
            return;
        };
        {
            let mut inputs = self.inputs.borrow_mut();
            inputs.content_type = template.content_type.clone();
            inputs.autogenerate_text = template.autogenerate_text;
        }
        self.status = format!("Editing {}", template.label());
        self.editor = Some(EditorBuffers::from_template(template));
        self.preview = None;
        self.show_preview = false;
        info!(name, ?scope, "template opened in the editor");

        // A freshly opened form gets its layout without motion.
        self.controller.apply(false);
    }

    fn run_preview(&mut self) {
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        let template = editor.to_template(&self.inputs.borrow());
        let draft = Draft {
            context: context_from_pairs(self.context_text.lines()),
            to: vec!["preview@example.com".to_string()],
            ..Draft::default()
        };

        let outcome = compose(&template, &draft, &self.settings);
        self.journal
            .record(&template, &draft.to, outcome.as_ref(), &self.settings);

        match outcome {
            Ok(message) => {
                self.status = format!("Composed \"{}\"", message.subject);
                self.preview = Some(Ok(message));
            }
            Err(err) => {
                self.status = "Composition failed, see the preview window".to_string();
                self.preview = Some(Err(err.to_string()));
            }
        }
        self.show_preview = true;
    }

    fn save_current(&mut self) {
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        let mut template = editor.to_template(&self.inputs.borrow());
        if template.name.is_empty() {
            self.status = "A template needs a name before it can be saved".to_string();
            return;
        }
        template.touch(&std::env::var("USER").unwrap_or_default());
        let label = template.label();
        self.catalog.insert(template);
        info!(%label, "template saved to catalog");
        self.status = format!("Saved {label}");
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Mailsmith");
                ui.separator();
                if ui
                    .selectable_label(self.show_journal, "Journal")
                    .clicked()
                {
                    self.show_journal = !self.show_journal;
                }
            });
        });
    }

    fn sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("catalog")
            .default_width(250.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.strong("Templates");
                ui.separator();

                let mut clicked: Option<(String, Option<String>)> = None;
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for template in self.catalog.iter() {
                        let selected = self
                            .editor
                            .as_ref()
                            .is_some_and(|e| e.name == template.name && e.scope == template.scope);
                        if ui.selectable_label(selected, template.label()).clicked() {
                            clicked = Some((template.name.clone(), template.scope.clone()));
                        }
                    }
                });

                if let Some((name, scope)) = clicked {
                    self.open_template(&name, scope.as_deref());
                }
            });
    }

    fn central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.editor.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label("Select a template to edit");
                });
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.editor_form(ui);
            });
        });
    }

    fn editor_form(&mut self, ui: &mut egui::Ui) {
        let inputs = self.inputs.clone();
        let body_text_region = self.body_text_region.clone();
        let body_html_region = self.body_html_region.clone();
        let autogen_region = self.autogen_region.clone();

        let mut inputs_changed = false;
        let mut do_preview = false;
        let mut do_save = false;

        {
            let Some(editor) = self.editor.as_mut() else {
                return;
            };

            egui::Grid::new("template-meta")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut editor.name);
                    ui.end_row();

                    if let Some(scope) = editor.scope.as_mut() {
                        ui.label("Scope");
                        ui.text_edit_singleline(scope);
                        ui.end_row();
                    }

                    ui.label("Description");
                    ui.text_edit_singleline(&mut editor.description);
                    ui.end_row();

                    ui.label("Sender");
                    ui.text_edit_singleline(&mut editor.sender);
                    ui.end_row();

                    ui.label("CC");
                    ui.text_edit_singleline(&mut editor.cc);
                    ui.end_row();

                    ui.label("BCC");
                    ui.text_edit_singleline(&mut editor.bcc);
                    ui.end_row();
                });

            ui.horizontal(|ui| {
                ui.checkbox(&mut editor.enabled, "Enabled");
                ui.checkbox(&mut editor.suppress_log, "Suppress journal entries");
            });
            ui.separator();

            // The format selector is one of the two inputs the
            // visibility rules read.
            let current = inputs.borrow().content_type.clone();
            let mut selected = current.clone();
            egui::ComboBox::from_label("Format")
                .selected_text(selected.clone())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selected, PLAIN_TEXT.to_string(), PLAIN_TEXT);
                    ui.selectable_value(&mut selected, HTML.to_string(), HTML);
                });
            if selected != current {
                inputs.borrow_mut().content_type = selected;
                inputs_changed = true;
            }

            widgets::region(ui, &autogen_region, |ui| {
                let mut checked = inputs.borrow().autogenerate_text;
                if ui
                    .checkbox(&mut checked, "Autogenerate plain text from the HTML body")
                    .changed()
                {
                    inputs.borrow_mut().autogenerate_text = checked;
                    inputs_changed = true;
                }
            });

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Subject");
                ui.add(
                    egui::TextEdit::singleline(&mut editor.subject).desired_width(f32::INFINITY),
                );
            });

            widgets::region(ui, &body_text_region, |ui| {
                ui.label(egui::RichText::new("Body (plain text)").strong());
                ui.add(
                    egui::TextEdit::multiline(&mut editor.body_text)
                        .desired_rows(6)
                        .desired_width(f32::INFINITY)
                        .code_editor(),
                );
            });

            widgets::region(ui, &body_html_region, |ui| {
                ui.label(egui::RichText::new("Body (HTML)").strong());
                ui.add(
                    egui::TextEdit::multiline(&mut editor.body_html)
                        .desired_rows(8)
                        .desired_width(f32::INFINITY)
                        .code_editor(),
                );
            });

            ui.separator();
            ui.label("Preview context (one key=value per line)");
            ui.add(
                egui::TextEdit::multiline(&mut self.context_text)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("Preview").clicked() {
                    do_preview = true;
                }
                if ui.button("Save to catalog").clicked() {
                    do_save = true;
                }
            });
        }

        if inputs_changed {
            // Change events slide the affected regions.
            self.controller.apply(true);
        }
        if do_preview {
            self.run_preview();
        }
        if do_save {
            self.save_current();
        }
    }

    fn preview_window(&mut self, ctx: &egui::Context) {
        if self.preview.is_none() {
            return;
        }
        let mut open = self.show_preview;
        egui::Window::new("Preview")
            .open(&mut open)
            .default_width(480.0)
            .show(ctx, |ui| match &self.preview {
                Some(Ok(message)) => show_composed(ui, message),
                Some(Err(problems)) => {
                    ui.colored_label(egui::Color32::LIGHT_RED, problems);
                }
                None => {}
            });
        self.show_preview = open;
    }

    fn journal_window(&mut self, ctx: &egui::Context) {
        if !self.show_journal {
            return;
        }
        let mut open = self.show_journal;
        let mut purge = false;
        egui::Window::new("Journal")
            .open(&mut open)
            .default_width(520.0)
            .show(ctx, |ui| {
                if self.journal.is_empty() {
                    ui.label("No composition attempts recorded yet.");
                } else {
                    egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                        for entry in self.journal.entries() {
                            let color = match entry.status {
                                EntryStatus::Success => egui::Color32::LIGHT_GREEN,
                                EntryStatus::Failure => egui::Color32::LIGHT_RED,
                            };
                            ui.horizontal(|ui| {
                                ui.monospace(
                                    entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                                );
                                ui.colored_label(color, &entry.template);
                                if !entry.message.is_empty() {
                                    ui.label(&entry.message);
                                }
                            });
                        }
                    });
                }
                ui.separator();
                if ui.button("Purge old entries").clicked() {
                    purge = true;
                }
            });
        self.show_journal = open;

        if purge {
            let removed = self.journal.purge(chrono::Utc::now(), &self.settings);
            self.status = format!("Purged {removed} journal entries");
        }
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });
    }
}

/// Render a composed message into the preview window.
fn show_composed(ui: &mut egui::Ui, message: &ComposedMessage) {
    egui::Grid::new("preview-envelope")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.strong("From");
            ui.label(&message.from);
            ui.end_row();
            ui.strong("To");
            ui.label(message.to.join(", "));
            ui.end_row();
            if !message.cc.is_empty() {
                ui.strong("CC");
                ui.label(message.cc.join(", "));
                ui.end_row();
            }
            if !message.bcc.is_empty() {
                ui.strong("BCC");
                ui.label(message.bcc.join(", "));
                ui.end_row();
            }
            ui.strong("Subject");
            ui.label(&message.subject);
            ui.end_row();
        });

    ui.separator();
    ui.monospace(&message.body);

    if let Some(html) = &message.html_body {
        ui.collapsing("HTML alternative", |ui| {
            ui.monospace(html);
        });
    }
}

impl eframe::App for AdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.top_bar(ctx);
        self.sidebar(ctx);
        self.central(ctx);
        self.preview_window(ctx);
        self.journal_window(ctx);
        self.status_bar(ctx);
    }
}
