//! Scanner roster and per-profile selection
//!
//! The roster is an explicit category-to-scanner table constructed fresh per
//! orchestrator instance. A scanner implementation may own several
//! categories (the injection scanner owns SQL injection, command injection,
//! path traversal and SSRF); selection de-duplicates by instance so a
//! multi-category scanner runs exactly once.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use gitscan_core::config::ToolsConfig;
use gitscan_core::{Category, DirectoryScanner, FileScanner, ScanProfile};
use tracing::info;

use gitscan_rules::catalog;
use gitscan_tools::{BanditScanner, DependencyScanner, SemgrepScanner};

/// Scanners selected for one scan.
pub struct ScannerSelection {
    pub file_scanners: Vec<Arc<dyn FileScanner>>,
    pub directory_scanners: Vec<Arc<dyn DirectoryScanner>>,
}

/// The fixed set of scanner instances plus the category ownership table.
pub struct ScannerRoster {
    file_scanners: Vec<Arc<dyn FileScanner>>,
    directory_scanners: Vec<Arc<dyn DirectoryScanner>>,
    file_by_category: HashMap<Category, usize>,
    directory_by_category: HashMap<Category, Vec<usize>>,
}

impl ScannerRoster {
    /// Empty roster; used by tests to register stand-in scanners.
    pub fn empty() -> Self {
        Self {
            file_scanners: Vec::new(),
            directory_scanners: Vec::new(),
            file_by_category: HashMap::new(),
            directory_by_category: HashMap::new(),
        }
    }

    /// The standard roster: every pattern catalog plus the tool adapters.
    pub fn standard(tools: &ToolsConfig) -> Self {
        let mut roster = Self::empty();

        roster.register_file_scanner(Arc::new(catalog::xss::scanner()), &[Category::Xss]);
        roster.register_file_scanner(
            Arc::new(catalog::injection::scanner()),
            &[
                Category::SqlInjection,
                Category::CommandInjection,
                Category::PathTraversal,
                Category::Ssrf,
            ],
        );
        roster.register_file_scanner(
            Arc::new(catalog::secrets::scanner()),
            &[Category::SecretsExposure],
        );
        roster.register_file_scanner(Arc::new(catalog::csrf::scanner()), &[Category::Csrf]);
        roster.register_file_scanner(Arc::new(catalog::session::scanner()), &[Category::Session]);
        roster.register_file_scanner(Arc::new(catalog::idor::scanner()), &[Category::Idor]);
        roster.register_file_scanner(
            Arc::new(catalog::misconfig::scanner()),
            &[
                Category::Configuration,
                Category::Authentication,
                Category::Authorization,
                Category::Cryptography,
                Category::OpenRedirect,
            ],
        );

        roster.register_directory_scanner(
            Arc::new(SemgrepScanner::new(&tools.semgrep)),
            &[Category::CodeQuality],
        );
        roster.register_directory_scanner(
            Arc::new(BanditScanner::new(&tools.bandit)),
            &[Category::CodeQuality],
        );
        roster.register_directory_scanner(
            Arc::new(DependencyScanner::new(&tools.safety)),
            &[Category::Dependency],
        );

        roster
    }

    pub fn register_file_scanner(
        &mut self,
        scanner: Arc<dyn FileScanner>,
        categories: &[Category],
    ) {
        let index = self.file_scanners.len();
        self.file_scanners.push(scanner);
        for category in categories {
            self.file_by_category.insert(*category, index);
        }
    }

    pub fn register_directory_scanner(
        &mut self,
        scanner: Arc<dyn DirectoryScanner>,
        categories: &[Category],
    ) {
        let index = self.directory_scanners.len();
        self.directory_scanners.push(scanner);
        for category in categories {
            self.directory_by_category
                .entry(*category)
                .or_default()
                .push(index);
        }
    }

    /// Select scanners for the requested profile.
    ///
    /// `Full` and `Quick` use the complete roster. `Custom` with a non-empty
    /// category list maps each category to its owning scanner, de-duplicated
    /// by instance; unmapped categories are silently ignored. `Custom` with
    /// an empty list falls back to the full roster.
    pub fn select(&self, profile: ScanProfile, categories: &[Category]) -> ScannerSelection {
        let selection = if profile == ScanProfile::Custom && !categories.is_empty() {
            let mut file_indices = HashSet::new();
            let mut directory_indices = HashSet::new();

            for category in categories {
                if let Some(index) = self.file_by_category.get(category) {
                    file_indices.insert(*index);
                }
                if let Some(indices) = self.directory_by_category.get(category) {
                    directory_indices.extend(indices.iter().copied());
                }
            }

            let mut file_indices: Vec<_> = file_indices.into_iter().collect();
            file_indices.sort_unstable();
            let mut directory_indices: Vec<_> = directory_indices.into_iter().collect();
            directory_indices.sort_unstable();

            ScannerSelection {
                file_scanners: file_indices
                    .into_iter()
                    .map(|i| Arc::clone(&self.file_scanners[i]))
                    .collect(),
                directory_scanners: directory_indices
                    .into_iter()
                    .map(|i| Arc::clone(&self.directory_scanners[i]))
                    .collect(),
            }
        } else {
            ScannerSelection {
                file_scanners: self.file_scanners.iter().map(Arc::clone).collect(),
                directory_scanners: self.directory_scanners.iter().map(Arc::clone).collect(),
            }
        };

        info!(
            ?profile,
            file_scanners = ?selection.file_scanners.iter().map(|s| s.name()).collect::<Vec<_>>(),
            directory_scanners = ?selection.directory_scanners.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "Scanners selected"
        );

        selection
    }

    /// Category metadata for the rules listing endpoint.
    pub fn known_categories(&self) -> Vec<Category> {
        let mut categories: Vec<_> = self
            .file_by_category
            .keys()
            .chain(self.directory_by_category.keys())
            .copied()
            .collect();
        categories.sort_by_key(|c| c.as_str());
        categories.dedup();
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_selection_dedupes_multi_category_scanners() {
        let roster = ScannerRoster::standard(&ToolsConfig::default());
        let selection = roster.select(
            ScanProfile::Custom,
            &[
                Category::SecretsExposure,
                Category::SqlInjection,
                Category::CommandInjection,
            ],
        );

        // SQL_INJECTION and COMMAND_INJECTION share the injection scanner:
        // three categories, exactly two instances.
        assert_eq!(selection.file_scanners.len(), 2);
        assert!(selection.directory_scanners.is_empty());
    }

    #[test]
    fn unknown_categories_are_silently_ignored() {
        let roster = ScannerRoster::standard(&ToolsConfig::default());
        let selection = roster.select(ScanProfile::Custom, &[Category::Xxe]);
        assert!(selection.file_scanners.is_empty());
        assert!(selection.directory_scanners.is_empty());
    }

    #[test]
    fn custom_with_empty_list_falls_back_to_full_roster() {
        let roster = ScannerRoster::standard(&ToolsConfig::default());
        let full = roster.select(ScanProfile::Full, &[]);
        let custom = roster.select(ScanProfile::Custom, &[]);
        assert_eq!(full.file_scanners.len(), custom.file_scanners.len());
        assert_eq!(
            full.directory_scanners.len(),
            custom.directory_scanners.len()
        );
    }

    #[test]
    fn full_and_quick_use_the_complete_roster() {
        let roster = ScannerRoster::standard(&ToolsConfig::default());
        let full = roster.select(ScanProfile::Full, &[]);
        assert_eq!(full.file_scanners.len(), 7);
        assert_eq!(full.directory_scanners.len(), 3);

        let quick = roster.select(ScanProfile::Quick, &[]);
        assert_eq!(quick.file_scanners.len(), 7);
    }

    #[test]
    fn code_quality_maps_to_both_tool_scanners() {
        let roster = ScannerRoster::standard(&ToolsConfig::default());
        let selection = roster.select(ScanProfile::Custom, &[Category::CodeQuality]);
        assert!(selection.file_scanners.is_empty());
        assert_eq!(selection.directory_scanners.len(), 2);
    }
}
