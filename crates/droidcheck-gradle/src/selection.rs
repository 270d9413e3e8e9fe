//! Variant selection by module and variant filters

use droidcheck_core::{EmptySelectionPolicy, TaskKind};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SelectionError;
use crate::variants::VariantSet;

/// Outcome of filtering the discovered variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Everything the driver reported
    pub all: VariantSet,
    /// What will actually run
    pub selected: VariantSet,
}

/// One module's discovered variants, in discovery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSelection {
    pub module: String,
    pub variants: Vec<VariantStatus>,
}

/// A discovered variant and whether it will run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantStatus {
    pub name: String,
    pub selected: bool,
}

impl Selection {
    /// Nothing left to run
    pub fn is_empty(&self) -> bool {
        self.selected.variant_count() == 0
    }

    pub fn is_selected(&self, module: &str, variant: &str) -> bool {
        self.selected
            .get(module)
            .is_some_and(|variants| variants.iter().any(|v| v == variant))
    }

    /// Every discovered variant, marked selected or skipped
    pub fn report(&self) -> Vec<ModuleSelection> {
        self.all
            .iter()
            .map(|(module, variants)| ModuleSelection {
                module: module.to_string(),
                variants: variants
                    .iter()
                    .map(|name| VariantStatus {
                        name: name.clone(),
                        selected: self.is_selected(module, name),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Filter `all` by the optional module and variant constraints.
///
/// Variant names match case-insensitively and exactly; for unit-test tasks
/// `<filter>UnitTest` matches as well, since Gradle reports those variants
/// with the suffix. An empty result is an error only under
/// [`EmptySelectionPolicy::Fail`].
pub fn select_variants(
    all: &VariantSet,
    module_filter: Option<&str>,
    variant_filter: Option<&str>,
    kind: TaskKind,
    policy: EmptySelectionPolicy,
) -> Result<Selection, SelectionError> {
    let scoped = match module_filter {
        Some(module) => {
            let key = find_module(all, module).ok_or_else(|| SelectionError::ModuleNotFound {
                module: module.to_string(),
                available: all.modules().collect::<Vec<_>>().join(", "),
            })?;
            let mut scoped = VariantSet::new();
            scoped.insert(key, all.get(key).unwrap_or_default().to_vec());
            scoped
        }
        None => all.clone(),
    };

    let selected = match variant_filter {
        None => scoped,
        Some(filter) => {
            let wanted = filter.to_lowercase();
            let wanted_suffixed = kind
                .variant_suffix()
                .map(|suffix| format!("{}{}", filter, suffix).to_lowercase());

            let mut filtered = VariantSet::new();
            for (module, variants) in scoped.iter() {
                for variant in variants {
                    let name = variant.to_lowercase();
                    if name == wanted || wanted_suffixed.as_deref() == Some(name.as_str()) {
                        filtered.push(module, variant.clone());
                    }
                }
            }
            filtered
        }
    };

    let selection = Selection {
        all: all.clone(),
        selected,
    };

    if selection.is_empty() {
        match policy {
            EmptySelectionPolicy::Fail => {
                return Err(SelectionError::VariantNotFound {
                    variant: variant_filter.unwrap_or("<any>").to_string(),
                });
            }
            EmptySelectionPolicy::Skip => {
                info!("no buildable variants selected");
            }
        }
    }

    debug!(
        selected = selection.selected.variant_count(),
        discovered = all.variant_count(),
        "variant selection done"
    );
    Ok(selection)
}

/// Exact key first, then ignoring a leading `:` on either side
fn find_module<'a>(all: &'a VariantSet, module: &str) -> Option<&'a str> {
    if let Some(key) = all.modules().find(|m| *m == module) {
        return Some(key);
    }
    let bare = module.trim_start_matches(':');
    all.modules().find(|m| m.trim_start_matches(':') == bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VariantSet {
        [
            (":app", vec!["debug", "release"]),
            (":lib", vec!["debug"]),
        ]
        .into_iter()
        .collect()
    }

    fn select(
        all: &VariantSet,
        module: Option<&str>,
        variant: Option<&str>,
    ) -> Result<Selection, SelectionError> {
        select_variants(
            all,
            module,
            variant,
            TaskKind::Snapshot,
            EmptySelectionPolicy::Skip,
        )
    }

    #[test]
    fn test_module_and_variant_filter() {
        let selection = select(&sample(), Some(":app"), Some("Release")).unwrap();
        let expected: VariantSet = [(":app", vec!["release"])].into_iter().collect();
        assert_eq!(selection.selected, expected);
    }

    #[test]
    fn test_variant_filter_any_case() {
        for filter in ["release", "RELEASE", "rElEaSe"] {
            let selection = select(&sample(), Some(":app"), Some(filter)).unwrap();
            assert_eq!(selection.selected.get(":app").unwrap().to_vec(), vec!["release"]);
        }
    }

    #[test]
    fn test_missing_module() {
        let err = select(&sample(), Some(":missing"), None).unwrap_err();
        assert!(matches!(err, SelectionError::ModuleNotFound { ref module, .. } if module == ":missing"));
    }

    #[test]
    fn test_module_filter_tolerates_leading_colon() {
        let selection = select(&sample(), Some("lib"), None).unwrap();
        assert_eq!(selection.selected.modules().collect::<Vec<_>>(), vec![":lib"]);

        let bare: VariantSet = [("app", vec!["debug"])].into_iter().collect();
        let selection = select(&bare, Some(":app"), None).unwrap();
        assert_eq!(selection.selected, bare);
    }

    #[test]
    fn test_module_filter_prefers_exact_key() {
        let all: VariantSet = [("app", vec!["debug"]), (":app", vec!["release"])]
            .into_iter()
            .collect();

        let selection = select(&all, Some(":app"), None).unwrap();
        assert_eq!(selection.selected.get(":app").unwrap().to_vec(), vec!["release"]);
        assert!(selection.selected.get("app").is_none());

        let err = select(&all, Some("App"), None).unwrap_err();
        assert!(matches!(err, SelectionError::ModuleNotFound { .. }));
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let all = sample();
        let selection = select(&all, None, None).unwrap();
        assert_eq!(selection.selected, all);
    }

    #[test]
    fn test_variant_filter_across_modules() {
        let selection = select(&sample(), None, Some("debug")).unwrap();
        let expected: VariantSet = [(":app", vec!["debug"]), (":lib", vec!["debug"])]
            .into_iter()
            .collect();
        assert_eq!(selection.selected, expected);
    }

    #[test]
    fn test_substring_does_not_match() {
        let selection = select(&sample(), None, Some("deb")).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_unit_test_suffix_matches() {
        let all: VariantSet = [("app", vec!["debugUnitTest", "releaseUnitTest"])]
            .into_iter()
            .collect();

        let selection = select_variants(
            &all,
            None,
            Some("Debug"),
            TaskKind::UnitTest,
            EmptySelectionPolicy::Skip,
        )
        .unwrap();
        assert_eq!(selection.selected.get("app").unwrap().to_vec(), vec!["debugUnitTest"]);

        // snapshot tasks do not get the suffix
        let selection = select_variants(
            &all,
            None,
            Some("Debug"),
            TaskKind::Snapshot,
            EmptySelectionPolicy::Skip,
        )
        .unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_empty_selection_policies() {
        let skipped = select_variants(
            &sample(),
            None,
            Some("staging"),
            TaskKind::Snapshot,
            EmptySelectionPolicy::Skip,
        )
        .unwrap();
        assert!(skipped.is_empty());

        let failed = select_variants(
            &sample(),
            None,
            Some("staging"),
            TaskKind::Snapshot,
            EmptySelectionPolicy::Fail,
        );
        assert_eq!(
            failed.unwrap_err(),
            SelectionError::VariantNotFound {
                variant: "staging".to_string()
            }
        );
    }

    #[test]
    fn test_report_marks_selected_and_skipped() {
        let selection = select(&sample(), Some(":app"), Some("debug")).unwrap();
        let report = selection.report();

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].module, ":app");
        assert_eq!(
            report[0].variants,
            vec![
                VariantStatus {
                    name: "debug".to_string(),
                    selected: true
                },
                VariantStatus {
                    name: "release".to_string(),
                    selected: false
                },
            ]
        );
        assert_eq!(report[1].module, ":lib");
        assert!(report[1].variants.iter().all(|v| !v.selected));
    }

    #[test]
    fn test_report_keeps_discovery_order() {
        let all: VariantSet = [(":app", vec!["alpha", "beta", "gamma"])]
            .into_iter()
            .collect();
        let selection = select(&all, None, Some("beta")).unwrap();

        let report = selection.report();
        let listed: Vec<_> = report[0]
            .variants
            .iter()
            .map(|v| (v.name.as_str(), v.selected))
            .collect();
        assert_eq!(
            listed,
            vec![("alpha", false), ("beta", true), ("gamma", false)]
        );
    }
}
