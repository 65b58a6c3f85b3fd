use metrics_exporter_prometheus::PrometheusHandle;
use resource_library::applications::LegacyApplicationImporter;
use resource_library::config::LibraryConfig;
use resource_library::error::AppError;
use resource_library::store::{InMemoryLibraryStore, LibrarySeed};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the catalogue seed, then any legacy export, into a fresh store.
pub(crate) fn build_store(config: &LibraryConfig) -> Result<InMemoryLibraryStore, AppError> {
    let seed = match &config.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading library seed");
            LibrarySeed::from_path(path)?
        }
        None => LibrarySeed::default(),
    };
    let store = InMemoryLibraryStore::from_seed(seed);

    if let Some(path) = &config.import_csv {
        let imported = LegacyApplicationImporter::from_path(path, &store)?;
        info!(path = %path.display(), imported, "legacy applications loaded");
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_library::store::PartnerRepository;
    use std::path::PathBuf;

    #[test]
    fn empty_configuration_builds_an_empty_store() {
        let store = build_store(&LibraryConfig::default()).expect("store builds");
        assert!(store.partners().expect("list").is_empty());
    }

    #[test]
    fn missing_seed_file_is_reported() {
        let config = LibraryConfig {
            seed_path: Some(PathBuf::from("/nonexistent/library-seed.json")),
            import_csv: None,
        };
        assert!(matches!(build_store(&config), Err(AppError::Seed(_))));
    }

    #[test]
    fn missing_import_file_is_reported() {
        let config = LibraryConfig {
            seed_path: None,
            import_csv: Some(PathBuf::from("/nonexistent/legacy.csv")),
        };
        assert!(matches!(build_store(&config), Err(AppError::Import(_))));
    }
}
