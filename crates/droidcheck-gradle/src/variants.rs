//! Module to variant mapping reported by Gradle

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Variants per module, in discovery order.
///
/// Module identifiers use Gradle's `:` separator (`app`, `feature:login`,
/// possibly with a leading `:`). Variant names are kept exactly as the
/// driver reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSet(IndexMap<String, Vec<String>>);

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variant to a module, creating the module entry if needed
    pub fn push(&mut self, module: impl Into<String>, variant: impl Into<String>) {
        self.0.entry(module.into()).or_default().push(variant.into());
    }

    /// Insert a module with its full variant list
    pub fn insert(&mut self, module: impl Into<String>, variants: Vec<String>) {
        self.0.insert(module.into(), variants);
    }

    pub fn get(&self, module: &str) -> Option<&[String]> {
        self.0.get(module).map(Vec::as_slice)
    }

    /// Iterate over `(module, variants)` in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(m, v)| (m.as_str(), v.as_slice()))
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of modules
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of variants across all modules
    pub fn variant_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl<M, V> FromIterator<(M, Vec<V>)> for VariantSet
where
    M: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (M, Vec<V>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (module, variants) in iter {
            set.insert(module, variants.into_iter().map(Into::into).collect());
        }
        set
    }
}

/// Directory of a module inside the project (`feature:login` -> `feature/login`)
pub fn module_path(project: &Path, module: &str) -> PathBuf {
    let mut path = project.to_path_buf();
    for segment in module.split(':').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

/// File-name friendly module name (`:feature:login` -> `feature-login`)
pub fn module_slug(module: &str) -> String {
    module
        .split(':')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_discovery_order() {
        let mut set = VariantSet::new();
        set.push("lib", "release");
        set.push("app", "debug");
        set.push("lib", "debug");

        let modules: Vec<_> = set.modules().collect();
        assert_eq!(modules, vec!["lib", "app"]);
        assert_eq!(set.get("lib").unwrap().to_vec(), vec!["release", "debug"]);
        assert_eq!(set.variant_count(), 3);
    }

    #[test]
    fn test_from_iter() {
        let set: VariantSet = [(":app", vec!["debug", "release"])].into_iter().collect();
        assert!(set.get(":app").is_some());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_module_path() {
        let project = Path::new("/work/project");
        assert_eq!(module_path(project, "app"), PathBuf::from("/work/project/app"));
        assert_eq!(
            module_path(project, ":feature:login"),
            PathBuf::from("/work/project/feature/login")
        );
        assert_eq!(module_path(project, ""), PathBuf::from("/work/project"));
    }

    #[test]
    fn test_module_slug() {
        assert_eq!(module_slug("app"), "app");
        assert_eq!(module_slug(":feature:login"), "feature-login");
    }
}
