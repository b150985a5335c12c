//! Mailsmith - admin studio for templated email messages.
//!
//! Edits a catalog of subject/body templates, previews composed
//! messages, and keeps a journal of composition attempts. The default
//! front end is an egui window; `--console` starts a REPL instead.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailsmith::form::visibility::{HTML, PLAIN_TEXT};
use mailsmith::paths::AppPaths;
use mailsmith::settings::AppSettings;
use mailsmith::template::registry::TemplateCatalog;
use mailsmith::template::MessageTemplate;
use mailsmith::{admin, cli};

/// Mailsmith - edit, preview, and organize templated email messages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Path to the template catalog file
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Write logs to a daily rolling file as well as stderr
    #[arg(long)]
    log_file: bool,

    /// Run the console admin instead of the GUI
    #[arg(long)]
    console: bool,

    /// Print the template catalog and exit
    #[arg(long)]
    list_templates: bool,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let paths = AppPaths::detect(args.settings.clone(), args.catalog.clone());
    init_logging(&args.log_level, args.log_file.then(|| paths.logs_dir.clone()))?;

    info!("Starting Mailsmith...");

    let settings = AppSettings::load_or_default(&paths.settings)?;
    let catalog = load_catalog(&paths)?;

    if args.list_templates {
        list_templates(&catalog);
        return Ok(());
    }

    if args.console {
        cli::run_repl(settings, catalog)?;
    } else {
        admin::run_admin(settings, catalog)?;
    }

    info!("Mailsmith shutdown complete");
    Ok(())
}

fn init_logging(level: &str, logs_dir: Option<PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    match logs_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "mailsmith.log");
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(appender),
                )
                .init();
        }
        None => registry.init(),
    }

    Ok(())
}

fn load_catalog(paths: &AppPaths) -> Result<TemplateCatalog> {
    if paths.catalog.exists() {
        return TemplateCatalog::load_from_file(&paths.catalog);
    }
    info!(
        path = %paths.catalog.display(),
        "no catalog file, starting with a sample template"
    );
    Ok(TemplateCatalog::from_templates(vec![sample_template()]))
}

/// Starter template for a first run without a catalog file.
fn sample_template() -> MessageTemplate {
    let mut template = MessageTemplate::new("Welcome");
    template.description = "Sent to new accounts right after signup.".to_string();
    template.content_type = HTML.to_string();
    template.subject_template = "Welcome, {{ user }}!".to_string();
    template.body_template_html =
        "<h1>Welcome, {{ user }}!</h1><p>Thanks for joining us.</p>".to_string();
    template
}

fn list_templates(catalog: &TemplateCatalog) {
    println!("\n{}", "=== Template Catalog ===".bold().cyan());
    println!(
        "  Total templates: {}",
        catalog.len().to_string().green()
    );
    println!();

    for template in catalog.iter() {
        let format = if template.is_plain_text() {
            PLAIN_TEXT.dimmed()
        } else {
            HTML.cyan()
        };
        println!("  {:<40} {}", template.label().bold(), format);
        if !template.description.is_empty() {
            println!("    {}", template.description.dimmed());
        }
    }
}
