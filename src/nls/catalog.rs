//! Localization catalog: id → locale → text, with positional substitution.

use std::collections::HashMap;

/// Errors from resource lookup.
///
/// Both variants are configuration defects: they are raised synchronously at
/// the point of lookup and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NlsError {
    /// The requested id has no entry at all.
    #[error("nls string '{id}' is undefined")]
    MissingResource { id: String },
    /// The id exists but carries no text for the resolved locale.
    #[error("nls string '{id}' has no text for locale '{locale}'")]
    MissingLocale { id: String, locale: String },
}

/// Replace every literal occurrence of `{i}` in `text` with `subs[i]`.
///
/// Unmatched tokens are left verbatim. There is no escaping mechanism for
/// literal brace sequences.
pub fn format(text: &str, subs: &[&str]) -> String {
    let mut out = text.to_owned();
    for (i, sub) in subs.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), sub);
    }
    out
}

/// Per-component localization lookup.
///
/// Maps string ids to per-locale text. The current locale is stamped on the
/// catalog by the [`Builder`](crate::component::Builder) at construction time
/// and used whenever a lookup gives no explicit locale.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    strings: HashMap<String, HashMap<String, String>>,
    locale: String,
}

impl ResourceCatalog {
    /// Create an empty catalog with the "en" locale.
    pub fn new() -> Self {
        Self {
            strings: HashMap::new(),
            locale: "en".to_owned(),
        }
    }

    /// The catalog's current locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Set the catalog's current locale.
    pub fn set_locale(&mut self, locale: &str) {
        self.locale = locale.to_owned();
    }

    /// Set or overwrite the text for one `(id, locale)` pair, creating the id
    /// entry if absent.
    pub fn add(&mut self, id: &str, locale: &str, text: &str) {
        self.strings
            .entry(id.to_owned())
            .or_default()
            .insert(locale.to_owned(), text.to_owned());
    }

    /// Chainable [`ResourceCatalog::add`].
    pub fn with(mut self, id: &str, locale: &str, text: &str) -> Self {
        self.add(id, locale, text);
        self
    }

    /// Shallow-merge `other` into this catalog.
    ///
    /// For any id present in both, `other`'s entire per-locale map replaces
    /// this catalog's entry; locale-level merging does not occur.
    pub fn merge(&mut self, other: &ResourceCatalog) {
        for (id, locales) in &other.strings {
            self.strings.insert(id.clone(), locales.clone());
        }
    }

    /// Look up a localized string and run it through [`format`].
    ///
    /// The locale is the explicit `locale` argument when given, else the
    /// catalog's current locale.
    pub fn resource(
        &self,
        id: &str,
        subs: &[&str],
        locale: Option<&str>,
    ) -> Result<String, NlsError> {
        let entry = self.strings.get(id).ok_or_else(|| NlsError::MissingResource {
            id: id.to_owned(),
        })?;

        let locale = locale.unwrap_or(&self.locale);
        let text = entry.get(locale).ok_or_else(|| NlsError::MissingLocale {
            id: id.to_owned(),
            locale: locale.to_owned(),
        })?;

        Ok(format(text, subs))
    }
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
