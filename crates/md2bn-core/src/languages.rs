//! Code-block languages known to the external highlighter
//!
//! The transformer never highlights code itself. It only uses this table to
//! validate the language token of a fenced block and, optionally, to
//! normalize aliases to the name the highlighter registered.

use std::collections::{BTreeMap, BTreeSet};

/// Language names and aliases, compared case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Languages {
    names: BTreeSet<String>,
    aliases: BTreeMap<String, String>,
}

impl Languages {
    /// An empty table; every token is unrecognized
    pub fn new() -> Self {
        Self::default()
    }

    /// The language set the site highlighter registers, with its common aliases
    pub fn highlight_defaults() -> Self {
        let mut languages = Self::new();
        for name in [
            "javascript",
            "typescript",
            "golang",
            "json",
            "css",
            "html",
            "yaml",
            "dockerfile",
        ] {
            languages.register(name);
        }

        let aliases = [
            ("js", "javascript"),
            ("jsx", "javascript"),
            ("mjs", "javascript"),
            ("cjs", "javascript"),
            ("ts", "typescript"),
            ("tsx", "typescript"),
            ("go", "golang"),
            ("xml", "html"),
            ("xhtml", "html"),
            ("svg", "html"),
            ("yml", "yaml"),
            ("docker", "dockerfile"),
        ];
        for (alias, name) in aliases {
            languages.alias(alias, name);
        }
        languages
    }

    /// Register a language name
    pub fn register(&mut self, name: impl Into<String>) {
        self.names.insert(name.into().to_ascii_lowercase());
    }

    /// Register `alias` as another spelling of `name`
    ///
    /// The target is registered as a language too if it was not already.
    pub fn alias(&mut self, alias: impl Into<String>, name: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        self.names.insert(name.clone());
        self.aliases.insert(alias.into().to_ascii_lowercase(), name);
    }

    /// Canonical name for a token, if the highlighter knows it
    pub fn canonical(&self, token: &str) -> Option<&str> {
        let key = token.to_ascii_lowercase();
        self.names
            .get(&key)
            .or_else(|| self.aliases.get(&key))
            .map(String::as_str)
    }

    pub fn recognizes(&self, token: &str) -> bool {
        self.canonical(token).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
