use budget_core::{BudgetConfig, BudgetError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolve the directory exports are written to.
///
/// A configured `export_dir` must already exist: the app refuses to start
/// otherwise. Without one, `~/.budgetpro/exports` is created on demand.
pub fn mount_export_dir(config: &BudgetConfig) -> Result<PathBuf, BudgetError> {
    match &config.export_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(BudgetError::MountMissing(dir.clone()));
            }
            info!("Using export directory {}", dir.display());
            Ok(dir.clone())
        }
        None => {
            let dir = BudgetConfig::default_export_dir()
                .map_err(|e| BudgetError::Config(format!("{e:#}")))?;
            create_default(&dir)?;
            Ok(dir)
        }
    }
}

fn create_default(dir: &Path) -> Result<(), BudgetError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| {
            BudgetError::Config(format!("Failed to create {}: {e}", dir.display()))
        })?;
        info!("Created export directory {}", dir.display());
    }
    Ok(())
}
