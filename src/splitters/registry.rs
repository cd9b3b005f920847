use std::collections::BTreeMap;

use log::debug;

use crate::error::{CorpusError, Result};
use crate::model::Provider;
use crate::splitters::{archive, gutenberg, Strategy};

/// Name → strategy table for one provider family.
///
/// Built explicitly, so independent instances never share state.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    provider: Provider,
    strategies: BTreeMap<String, Strategy>,
    loaded: bool,
}

impl StrategyRegistry {
    /// An empty registry for `provider`
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            strategies: BTreeMap::new(),
            loaded: false,
        }
    }

    /// A registry holding every built-in strategy of the family
    pub fn builtin(provider: Provider) -> Self {
        let mut registry = Self::new(provider);
        registry.load();
        registry
    }

    /// Register the family's built-in strategies. Calling it again is a no-op.
    pub fn load(&mut self) {
        if self.loaded {
            return;
        }
        let builtins = match self.provider {
            Provider::Gutenberg => gutenberg::STRATEGIES,
            Provider::InternetArchive => archive::STRATEGIES,
        };
        for (name, strategy) in builtins {
            self.register(*name, *strategy);
        }
        self.loaded = true;
        debug!(
            "Loaded {} {} strategies",
            self.strategies.len(),
            self.provider
        );
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Associate `name` with `strategy`. A later registration replaces an
    /// earlier one under the same name.
    pub fn register(&mut self, name: impl Into<String>, strategy: Strategy) {
        self.strategies.insert(name.into(), strategy);
    }

    /// Look up a strategy by its case-sensitive name
    pub fn get(&self, name: &str) -> Result<Strategy> {
        self.strategies
            .get(name)
            .copied()
            .ok_or_else(|| CorpusError::UnknownStrategy {
                name: name.to_string(),
                available: self.available(),
            })
    }

    /// Registered names in sorted order
    pub fn list(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// The family's preferred strategy if registered, else the first name in
    /// sorted order, else `None`.
    pub fn default_name(&self) -> Option<&str> {
        let preferred = preferred_strategy(self.provider);
        if let Some((name, _)) = self.strategies.get_key_value(preferred) {
            return Some(name.as_str());
        }
        self.strategies.keys().next().map(String::as_str)
    }

    /// Comma-separated registered names, for error messages
    pub fn available(&self) -> String {
        if self.strategies.is_empty() {
            "(none registered)".to_string()
        } else {
            self.list().join(", ")
        }
    }
}

/// Preferred strategy name per family
pub fn preferred_strategy(provider: Provider) -> &'static str {
    match provider {
        Provider::Gutenberg => "beeton_1861",
        Provider::InternetArchive => "raffald_1769",
    }
}
