// Effect registry
// Maps normalized effect names to implementations

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Confetti, Effect, Fireworks, Rainbow, ShootingStars, Solid};
use crate::error::{Error, Result};

/// Registry key for an effect name: lower-case with spaces removed.
///
/// "Shooting Stars", "shooting stars" and "shootingstars" share one key.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Registry of available effects
///
/// Filled once at startup, then shared read-only behind an `Arc`.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    effects: BTreeMap<String, Arc<dyn Effect>>,
}

impl EffectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every builtin effect registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.load_builtins();
        registry
    }

    /// Register all builtin effects under their display names
    pub fn load_builtins(&mut self) -> &mut Self {
        let builtins: [Arc<dyn Effect>; 5] = [
            Arc::new(Solid),
            Arc::new(ShootingStars),
            Arc::new(Fireworks),
            Arc::new(Rainbow),
            Arc::new(Confetti),
        ];
        for effect in builtins {
            let name = effect.name();
            self.register(name, effect);
        }
        self
    }

    /// Register an effect. An existing entry with the same normalized name
    /// is replaced.
    pub fn register(&mut self, name: &str, effect: Arc<dyn Effect>) -> &mut Self {
        self.effects.insert(normalize_name(name), effect);
        self
    }

    /// Look up an effect by (unnormalized) name
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Effect>> {
        self.effects
            .get(&normalize_name(name))
            .cloned()
            .ok_or_else(|| Error::UnknownEffect(name.to_string()))
    }

    /// Check if an effect is registered
    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(&normalize_name(name))
    }

    /// Registered keys, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    /// (key, effect) pairs, sorted by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Effect>)> {
        self.effects.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectContext, EffectError, EffectParams};

    struct Marker(&'static str);

    impl Effect for Marker {
        fn name(&self) -> &'static str {
            self.0
        }
        fn description(&self) -> &'static str {
            "test marker"
        }
        fn run(&self, _: &mut EffectContext<'_>, _: &EffectParams) -> Result<(), EffectError> {
            Ok(())
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Shooting Stars"), "shootingstars");
        assert_eq!(normalize_name("  RAIN bow "), "rainbow");
    }

    #[test]
    fn test_builtins_registered_eagerly() {
        let registry = EffectRegistry::with_builtins();
        assert_eq!(registry.len(), 5);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec!["confetti", "fireworks", "rainbow", "shootingstars", "solid"]
        );
    }

    #[test]
    fn test_resolve_normalizes() {
        let mut registry = EffectRegistry::new();
        let effect: Arc<dyn Effect> = Arc::new(Marker("Shooting Stars"));
        registry.register("Shooting Stars", effect.clone());
        let found = registry.resolve("shootingstars").unwrap();
        assert!(Arc::ptr_eq(&found, &effect));
        assert!(registry.resolve("Shooting  Stars").is_ok());
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = EffectRegistry::with_builtins();
        match registry.resolve("strobe") {
            Err(Error::UnknownEffect(name)) => assert_eq!(name, "strobe"),
            _ => panic!("expected UnknownEffect"),
        }
    }

    #[test]
    fn test_reregister_overwrites() {
        let mut registry = EffectRegistry::with_builtins();
        registry.register("solid", Arc::new(Marker("replacement")));
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.resolve("Solid").unwrap().name(), "replacement");
    }
}
