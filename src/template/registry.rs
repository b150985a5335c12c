//! In-memory template catalog with scoped lookup and fallback.
//!
//! Templates are keyed by `(name, scope)`. A scoped lookup that finds no
//! usable scoped template falls back to the unscoped template of the same
//! name, so an object can carry a specialized template where one exists
//! and share the default everywhere else. Disabled templates are
//! invisible to lookup but still listed, so the admin can edit them.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::MessageTemplate;

/// Lookup failure, carrying what was asked for.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no enabled template named {0:?}")]
    NotFound(String),
    #[error("no enabled template named {name:?} for scope {scope:?}")]
    NotFoundForScope { name: String, scope: String },
}

type Key = (String, Option<String>);

/// The set of templates the admin works on, seeded from a YAML file.
#[derive(Debug, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<Key, MessageTemplate>,
}

/// On-disk shape of the catalog seed file.
#[derive(Debug, Deserialize, Serialize)]
struct CatalogFile {
    templates: Vec<MessageTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(templates: Vec<MessageTemplate>) -> Self {
        let mut catalog = Self::new();
        for template in templates {
            catalog.insert(template);
        }
        catalog
    }

    /// Load the catalog from a YAML seed file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let file: CatalogFile = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML catalog: {}", path.display()))?;

        let catalog = Self::from_templates(file.templates);
        info!(
            count = catalog.len(),
            path = %path.display(),
            "template catalog loaded"
        );
        Ok(catalog)
    }

    /// Insert or replace a template under its `(name, scope)` key.
    pub fn insert(&mut self, template: MessageTemplate) {
        let key = (template.name.clone(), template.scope.clone());
        self.templates.insert(key, template);
    }

    /// Look up an enabled unscoped template by name.
    pub fn get(&self, name: &str) -> Result<&MessageTemplate, CatalogError> {
        self.templates
            .get(&(name.to_string(), None))
            .filter(|t| t.enabled)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Look up an enabled template for a scope, falling back to the
    /// unscoped template when the scoped one is missing or disabled.
    pub fn get_scoped(
        &self,
        name: &str,
        scope: Option<&str>,
    ) -> Result<&MessageTemplate, CatalogError> {
        let Some(scope) = scope else {
            return self.get(name);
        };

        let scoped_key = (name.to_string(), Some(scope.to_string()));
        if let Some(template) = self.templates.get(&scoped_key).filter(|t| t.enabled) {
            return Ok(template);
        }

        self.get(name).map_err(|_| CatalogError::NotFoundForScope {
            name: name.to_string(),
            scope: scope.to_string(),
        })
    }

    /// Access by exact key, disabled templates included. This is the
    /// editor's view; lookup for composition goes through
    /// [`get`](Self::get) and [`get_scoped`](Self::get_scoped).
    pub fn get_any(&self, name: &str, scope: Option<&str>) -> Option<&MessageTemplate> {
        let key = (name.to_string(), scope.map(str::to_string));
        self.templates.get(&key)
    }

    /// All templates in name order, disabled ones included.
    pub fn iter(&self) -> impl Iterator<Item = &MessageTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn template(name: &str, scope: Option<&str>, enabled: bool) -> MessageTemplate {
        let mut t = MessageTemplate::new(name);
        t.scope = scope.map(str::to_string);
        t.enabled = enabled;
        t.subject_template = format!("{name} subject");
        t
    }

    fn sample_catalog() -> TemplateCatalog {
        TemplateCatalog::from_templates(vec![
            template("Welcome", None, true),
            template("Welcome", Some("eu-site"), true),
            template("Digest", None, true),
            template("Retired", None, false),
            template("Digest", Some("eu-site"), false),
        ])
    }

    #[test]
    fn named_lookup_returns_the_enabled_template() {
        let catalog = sample_catalog();
        assert_eq!(catalog.get("Welcome").unwrap().name, "Welcome");
    }

    #[test]
    fn missing_and_disabled_lookups_fail() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.get("Nonexistent"),
            Err(CatalogError::NotFound("Nonexistent".to_string()))
        );
        assert_eq!(
            catalog.get("Retired"),
            Err(CatalogError::NotFound("Retired".to_string()))
        );
    }

    #[test]
    fn scoped_lookup_prefers_the_scoped_template() {
        let catalog = sample_catalog();
        let found = catalog.get_scoped("Welcome", Some("eu-site")).unwrap();
        assert_eq!(found.scope.as_deref(), Some("eu-site"));
    }

    #[test]
    fn scoped_lookup_falls_back_to_the_unscoped_template() {
        let catalog = sample_catalog();
        // No scoped template for this scope at all.
        let found = catalog.get_scoped("Welcome", Some("us-site")).unwrap();
        assert_eq!(found.scope, None);
        // Scoped template exists but is disabled.
        let found = catalog.get_scoped("Digest", Some("eu-site")).unwrap();
        assert_eq!(found.scope, None);
    }

    #[test]
    fn scoped_lookup_reports_the_scope_when_nothing_matches() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.get_scoped("Retired", Some("eu-site")),
            Err(CatalogError::NotFoundForScope {
                name: "Retired".to_string(),
                scope: "eu-site".to_string(),
            })
        );
    }

    #[test]
    fn exact_access_sees_disabled_templates() {
        let catalog = sample_catalog();
        assert!(catalog.get_any("Retired", None).is_some());
        assert!(catalog.get_any("Digest", Some("eu-site")).is_some());
        assert!(catalog.get_any("Digest", Some("us-site")).is_none());
    }

    #[test]
    fn iteration_sees_disabled_templates_in_name_order() {
        let catalog = sample_catalog();
        let names: Vec<_> = catalog.iter().map(|t| t.label()).collect();
        assert_eq!(
            names,
            vec![
                "Digest",
                "Digest for eu-site (Disabled)",
                "Retired (Disabled)",
                "Welcome",
                "Welcome for eu-site",
            ]
        );
    }

    #[test]
    fn catalog_loads_from_a_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "templates:\n  - name: Welcome\n    subject_template: Hi {{{{ user }}}}\n    body_template: Welcome aboard\n"
        )
        .unwrap();

        let catalog = TemplateCatalog::load_from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("Welcome").unwrap().subject_template,
            "Hi {{ user }}"
        );
    }

    #[test]
    fn loading_a_missing_file_is_an_error() {
        assert!(TemplateCatalog::load_from_file("/nonexistent/templates.yaml").is_err());
    }
}
