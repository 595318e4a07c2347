//! Topic canonicalization
//!
//! Maps free-text topic names coming from question records onto a closed set
//! of canonical topic keys. Lookups are case-insensitive and alias-aware; a
//! name that cannot be resolved yields `None` and the caller decides what to do
//! with the record.

use std::collections::HashMap;

use crate::error::CatalogError;

/// Canonical keys and their aliases shipped with [`TopicCatalog::default`]
const DEFAULT_TOPICS: &[(&str, &[&str])] = &[
    ("contract-law", &["contracts", "contract", "k", "sales", "ucc article 2"]),
    ("torts", &["tort", "tort law", "negligence"]),
    ("criminal-law", &["crim law", "crimlaw", "criminal"]),
    ("criminal-procedure", &["crim pro", "crimpro", "crim procedure"]),
    ("civil-procedure", &["civ pro", "civpro", "civil pro", "federal civil procedure"]),
    ("constitutional-law", &["con law", "conlaw", "constitutional"]),
    ("evidence", &["evid", "fre", "federal rules of evidence"]),
    ("real-property", &["property", "prop", "real property law"]),
    ("family-law", &["family", "domestic relations"]),
    ("business-associations", &["business orgs", "corporations", "agency & partnership"]),
    ("wills-and-trusts", &["wills", "trusts", "trusts & estates", "estates"]),
    ("professional-responsibility", &["pr", "mpre", "ethics"]),
];

/// Lowercase, trim, and collapse separators into single hyphens
pub fn normalize_topic_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace('&', " and ");
    let mut out = String::with_capacity(lowered.len());
    let mut pending_sep = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() || matches!(ch, '_' | '-' | '/') {
            pending_sep = true;
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('-');
        }
        pending_sep = false;
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone)]
pub struct TopicCatalog {
    aliases: HashMap<String, String>,
}

impl Default for TopicCatalog {
    fn default() -> Self {
        let mut builder = TopicCatalogBuilder::new();
        for (key, aliases) in DEFAULT_TOPICS {
            builder = builder.topic(key, aliases.iter().copied());
        }
        // the default table is static and conflict free
        match builder.build() {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::error!(error = %err, "default topic table is inconsistent");
                Self::empty()
            }
        }
    }
}

impl TopicCatalog {
    pub fn builder() -> TopicCatalogBuilder {
        TopicCatalogBuilder::new()
    }

    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Resolve a raw topic name to its canonical key
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let normalized = normalize_topic_name(raw);
        if normalized.is_empty() {
            return None;
        }
        self.aliases.get(&normalized).cloned()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.canonicalize(raw).is_some()
    }

    /// Distinct canonical keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.aliases.values().cloned().collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

#[derive(Debug, Default)]
pub struct TopicCatalogBuilder {
    entries: Vec<(String, Vec<String>)>,
}

impl TopicCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic<I, S>(mut self, key: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let aliases = aliases.into_iter().map(|a| a.as_ref().to_string()).collect();
        self.entries.push((key.to_string(), aliases));
        self
    }

    pub fn build(self) -> Result<TopicCatalog, CatalogError> {
        let mut aliases: HashMap<String, String> = HashMap::new();

        for (raw_key, raw_aliases) in self.entries {
            let key = normalize_topic_name(&raw_key);
            if key.is_empty() {
                return Err(CatalogError::EmptyKey);
            }

            let names = std::iter::once(key.clone())
                .chain(raw_aliases.iter().map(|a| normalize_topic_name(a)))
                .filter(|name| !name.is_empty());

            for name in names {
                match aliases.get(&name) {
                    Some(existing) if *existing != key => {
                        return Err(CatalogError::AliasConflict {
                            alias: name,
                            existing: existing.clone(),
                            requested: key,
                        });
                    }
                    Some(_) => {}
                    None => {
                        aliases.insert(name, key.clone());
                    }
                }
            }
        }

        Ok(TopicCatalog { aliases })
    }
}
