// SPDX-License-Identifier: PMPL-1.0-or-later

//! Key lookup with locale fallback.
//!
//! A lookup walks a chain of locales: the requested one, its primary
//! language (`pt-BR` -> `pt`), the configured fallbacks, then the reference
//! locale. When nothing in the chain has a usable value the key itself is
//! returned, so a missing translation is visible but never fatal.

use crate::catalog::{get_path, Catalog};
use crate::i18n::primary_language;
use crate::placeholder::Placeholders;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Which locale answered a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "locale", rename_all = "lowercase")]
pub enum Source {
    Requested,
    Fallback(String),
    /// Nothing resolved; the key was returned
    Key,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub key: String,
    pub value: String,
    pub source: Source,
}

pub struct Resolver<'a> {
    catalog: &'a Catalog,
    reference: String,
    fallbacks: Vec<String>,
    placeholders: Placeholders,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, reference: &str, fallbacks: &[String]) -> Self {
        Self {
            catalog,
            reference: reference.to_string(),
            fallbacks: fallbacks.to_vec(),
            placeholders: Placeholders::default(),
        }
    }

    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Locales consulted for `locale`, in order, without duplicates.
    pub fn chain(&self, locale: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let primary = primary_language(locale);
        let candidates = std::iter::once(locale)
            .chain((primary != locale).then_some(primary))
            .chain(self.fallbacks.iter().map(String::as_str))
            .chain(std::iter::once(self.reference.as_str()));
        for code in candidates {
            if self.catalog.contains(code) && !chain.iter().any(|c| c == code) {
                chain.push(code.to_string());
            }
        }
        chain
    }

    pub fn resolve(&self, locale: &str, key: &str) -> Resolution {
        for code in self.chain(locale) {
            let value = self
                .catalog
                .locale(&code)
                .and_then(|file| get_path(&file.tree, key))
                .and_then(usable_text);
            if let Some(value) = value {
                let source = if code == locale {
                    Source::Requested
                } else {
                    debug!(key, requested = locale, used = %code, "translation fallback");
                    Source::Fallback(code)
                };
                return Resolution {
                    key: key.to_string(),
                    value,
                    source,
                };
            }
        }

        debug!(key, locale, "translation missing in every fallback");
        Resolution {
            key: key.to_string(),
            value: key.to_string(),
            source: Source::Key,
        }
    }

    /// Resolve and interpolate placeholders
    pub fn t(&self, locale: &str, key: &str, params: &[(&str, &str)]) -> String {
        let resolution = self.resolve(locale, key);
        self.placeholders.interpolate(&resolution.value, params)
    }
}

fn usable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LocaleFile;
    use std::path::PathBuf;

    fn file(code: &str, json: &str) -> LocaleFile {
        LocaleFile::parse(code, PathBuf::from(format!("{code}.json")), json.to_string()).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::from_files(
            PathBuf::from("locales"),
            vec![
                file(
                    "pl",
                    r#"{"nav": {"home": "Strona główna", "offer": "Oferta"}, "calc": {"total": "Razem: {sum} PLN"}, "max": 40}"#,
                ),
                file("en", r#"{"nav": {"home": "Home", "offer": ""}}"#),
                file("pt", r#"{"nav": {"offer": "Oferta PT"}}"#),
                file("pt-BR", r#"{"nav": {"home": "Início"}}"#),
            ],
        )
    }

    #[test]
    fn requested_locale_wins() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, "pl", &[]);
        let res = resolver.resolve("en", "nav.home");
        assert_eq!(res.value, "Home");
        assert_eq!(res.source, Source::Requested);
    }

    #[test]
    fn empty_string_falls_back_to_reference() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, "pl", &[]);
        let res = resolver.resolve("en", "nav.offer");
        assert_eq!(res.value, "Oferta");
        assert_eq!(res.source, Source::Fallback("pl".to_string()));
    }

    #[test]
    fn region_falls_back_to_primary_language() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, "pl", &["en".to_string()]);
        assert_eq!(
            resolver.chain("pt-BR"),
            vec!["pt-BR", "pt", "en", "pl"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        let res = resolver.resolve("pt-BR", "nav.offer");
        assert_eq!(res.value, "Oferta PT");
        assert_eq!(res.source, Source::Fallback("pt".to_string()));
    }

    #[test]
    fn unknown_key_returns_key() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, "pl", &[]);
        let res = resolver.resolve("de", "nav.contact");
        assert_eq!(res.value, "nav.contact");
        assert_eq!(res.source, Source::Key);
    }

    #[test]
    fn subtree_is_not_a_translation() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, "pl", &[]);
        assert_eq!(resolver.resolve("pl", "nav").source, Source::Key);
    }

    #[test]
    fn numbers_render_and_params_interpolate() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, "pl", &[]);
        assert_eq!(resolver.t("en", "max", &[]), "40");
        assert_eq!(
            resolver.t("en", "calc.total", &[("sum", "12 500")]),
            "Razem: 12 500 PLN"
        );
    }
}
