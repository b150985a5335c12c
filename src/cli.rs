//! Console admin front end.
//!
//! A rustyline REPL driving the same form behavior as the GUI. Region
//! visibility changes are narrated as shown/hidden lines, with a
//! "(slide)" marker when the change would animate, so the editing flow
//! can be exercised and debugged without a window.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::form::visibility::{FieldLayout, FormState, HTML, PLAIN_TEXT};
use crate::form::{
    RegionHandle, SharedCheckbox, SharedInputs, SharedSelector, VisibilityController,
};
use crate::journal::Journal;
use crate::settings::AppSettings;
use crate::template::compose::{compose, Draft};
use crate::template::registry::TemplateCatalog;
use crate::template::render::context_from_pairs;
use crate::template::MessageTemplate;

/// One narrated form region.
#[derive(Debug)]
struct Region {
    label: &'static str,
    visible: Option<bool>,
}

struct ConsoleRegion(Rc<RefCell<Region>>);

impl RegionHandle for ConsoleRegion {
    fn set_visible(&mut self, visible: bool, animate: bool) {
        let mut region = self.0.borrow_mut();
        if region.visible == Some(visible) {
            return;
        }
        region.visible = Some(visible);

        let state = if visible {
            "shown".green()
        } else {
            "hidden".yellow()
        };
        let effect = if animate { " (slide)" } else { "" };
        println!("  {:<22} {}{}", region.label, state, effect.dimmed());
    }
}

/// Run the console admin until the user quits.
pub fn run_repl(settings: AppSettings, mut catalog: TemplateCatalog) -> Result<()> {
    let inputs = Rc::new(RefCell::new(SharedInputs::default()));
    let body_text = Rc::new(RefCell::new(Region {
        label: "body (plain text)",
        visible: None,
    }));
    let body_html = Rc::new(RefCell::new(Region {
        label: "body (HTML)",
        visible: None,
    }));
    let autogen_row = Rc::new(RefCell::new(Region {
        label: "autogenerate checkbox",
        visible: None,
    }));

    let mut controller = VisibilityController::new(
        Box::new(SharedSelector(inputs.clone())),
        Box::new(SharedCheckbox(inputs.clone())),
        Some(Box::new(ConsoleRegion(body_text))),
        Some(Box::new(ConsoleRegion(body_html))),
        Some(Box::new(ConsoleRegion(autogen_row))),
    );

    let mut journal = Journal::new();
    let mut current: Option<MessageTemplate> = None;

    println!(
        "{}",
        "Mailsmith console admin. Type 'help' for commands.".bold()
    );

    let mut rl = DefaultEditor::new()?;
    loop {
        let line = match rl.readline("mailsmith> ") {
            Ok(line) => line,
            Err(_) => break,
        };
        let _ = rl.add_history_entry(line.as_str());

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();
        debug!(command, ?args, "console command");

        match command {
            "exit" | "quit" => break,
            "help" => print_help(),
            "list" => cmd_list(&catalog),
            "open" => {
                cmd_open(&catalog, &args, &inputs, &mut current);
                if current.is_some() {
                    // Fresh form: establish the layout without motion.
                    controller.apply(false);
                }
            }
            "format" => {
                let Some(template) = current.as_mut() else {
                    println!("{}", "No template open.".red());
                    continue;
                };
                match args.first() {
                    Some(&value) if value == PLAIN_TEXT || value == HTML => {
                        template.content_type = value.to_string();
                        inputs.borrow_mut().content_type = value.to_string();
                        controller.apply(true);
                    }
                    _ => println!("Usage: format {PLAIN_TEXT}|{HTML}"),
                }
            }
            "autogen" => {
                let Some(template) = current.as_mut() else {
                    println!("{}", "No template open.".red());
                    continue;
                };
                match args.first() {
                    Some(&"on") | Some(&"off") => {
                        let on = args[0] == "on";
                        template.autogenerate_text = on;
                        inputs.borrow_mut().autogenerate_text = on;
                        controller.apply(true);
                    }
                    _ => println!("Usage: autogen on|off"),
                }
            }
            "fields" => cmd_fields(&inputs),
            "preview" => cmd_preview(&current, &args, &settings, &mut journal),
            "save" => match current.clone() {
                Some(template) => {
                    catalog.insert(template);
                    println!("Saved to catalog.");
                }
                None => println!("{}", "No template open.".red()),
            },
            "journal" => cmd_journal(&journal),
            "purge" => {
                let removed = journal.purge(chrono::Utc::now(), &settings);
                println!("Purged {removed} journal entries.");
            }
            other => println!("Unknown command: {other}. Type 'help'."),
        }
    }

    Ok(())
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  list                      show the template catalog");
    println!("  open <name> [scope]       open a template in the form");
    println!("  format <mime>             set the content type (text/plain or text/html)");
    println!("  autogen on|off            toggle plain-text autogeneration");
    println!("  fields                    show which form fields are visible");
    println!("  preview [key=value ...]   compose the open template with a context");
    println!("  save                      write the open template back to the catalog");
    println!("  journal                   list recorded composition attempts");
    println!("  purge                     drop journal entries past retention");
    println!("  exit                      leave the console");
}

fn cmd_list(catalog: &TemplateCatalog) {
    if catalog.is_empty() {
        println!("The catalog is empty.");
        return;
    }
    println!("{}", "Templates:".bold());
    for template in catalog.iter() {
        let format = if template.is_plain_text() {
            PLAIN_TEXT.dimmed()
        } else {
            HTML.cyan()
        };
        println!("  {:<40} {}", template.label(), format);
    }
}

fn cmd_open(
    catalog: &TemplateCatalog,
    args: &[&str],
    inputs: &Rc<RefCell<SharedInputs>>,
    current: &mut Option<MessageTemplate>,
) {
    let Some(name) = args.first() else {
        println!("Usage: open <name> [scope]");
        return;
    };

    match catalog.get_scoped(name, args.get(1).copied()) {
        Ok(template) => {
            {
                let mut form = inputs.borrow_mut();
                form.content_type = template.content_type.clone();
                form.autogenerate_text = template.autogenerate_text;
            }
            println!("Opened {}", template.label().bold());
            *current = Some(template.clone());
        }
        Err(err) => println!("{}", err.to_string().red()),
    }
}

fn cmd_fields(inputs: &Rc<RefCell<SharedInputs>>) {
    let form = inputs.borrow();
    let state = FormState {
        content_type: form.content_type.clone(),
        autogenerate_text: form.autogenerate_text,
    };
    let layout = FieldLayout::for_state(&state);
    let show = |visible: bool| {
        if visible {
            "shown".green()
        } else {
            "hidden".yellow()
        }
    };
    println!("  {:<22} {}", "body (plain text)", show(layout.body_text));
    println!("  {:<22} {}", "body (HTML)", show(layout.body_html));
    println!(
        "  {:<22} {}",
        "autogenerate checkbox",
        show(layout.autogenerate)
    );
}

fn cmd_preview(
    current: &Option<MessageTemplate>,
    args: &[&str],
    settings: &AppSettings,
    journal: &mut Journal,
) {
    let Some(template) = current else {
        println!("{}", "No template open.".red());
        return;
    };

    let draft = Draft {
        context: context_from_pairs(args.iter().copied()),
        to: vec!["preview@example.com".to_string()],
        ..Draft::default()
    };

    let outcome = compose(template, &draft, settings);
    journal.record(template, &draft.to, outcome.as_ref(), settings);

    match outcome {
        Ok(message) => {
            println!("{}", "From:".bold());
            println!("  {}", message.from);
            if !message.cc.is_empty() {
                println!("{}", "CC:".bold());
                println!("  {}", message.cc.join(", "));
            }
            println!("{}", "Subject:".bold());
            println!("  {}", message.subject);
            println!("{}", "Body:".bold());
            for line in message.body.lines() {
                println!("  {line}");
            }
            if let Some(html) = &message.html_body {
                println!("{}", "HTML alternative:".bold());
                for line in html.lines() {
                    println!("  {line}");
                }
            }
        }
        Err(err) => println!("{}", err.to_string().red()),
    }
}

fn cmd_journal(journal: &Journal) {
    if journal.is_empty() {
        println!("The journal is empty.");
        return;
    }
    for entry in journal.entries() {
        let status = match entry.status {
            crate::journal::EntryStatus::Success => "SUCCESS".green(),
            crate::journal::EntryStatus::Failure => "FAILURE".red(),
        };
        println!(
            "  {} {} '{}' {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            status,
            entry.template,
            entry.message.dimmed()
        );
    }
}
