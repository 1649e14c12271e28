//! Lazily loaded correction grid shared between threads.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::Result;
use crate::source::DenseGrid;
use crate::transform::OstnTransformer;

type Loader = Box<dyn Fn() -> Result<DenseGrid> + Send + Sync>;

/// Correction grid loaded once on first use.
///
/// Concurrent first callers block until the single load finishes; later
/// callers get the loaded grid without locking. A failed load is not
/// cached, so the next call tries again.
pub struct SharedGrid {
    loader: Loader,
    grid: OnceCell<Arc<DenseGrid>>,
}

impl SharedGrid {
    /// Grid loaded from a dataset file on first use.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::with_loader(move || DenseGrid::from_path(&path))
    }

    /// Grid produced by a custom loader on first use.
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<DenseGrid> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            grid: OnceCell::new(),
        }
    }

    /// The loaded grid, loading it if needed.
    pub fn get(&self) -> Result<Arc<DenseGrid>> {
        self.grid
            .get_or_try_init(|| {
                let grid = (self.loader)()?;
                info!(records = grid.len(), "Shared OSTN grid initialised");
                Ok(Arc::new(grid))
            })
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.grid.get().is_some()
    }

    /// Transformer over the shared grid.
    pub fn transformer(&self) -> Result<OstnTransformer<Arc<DenseGrid>>> {
        Ok(OstnTransformer::new(self.get()?))
    }
}

impl std::fmt::Debug for SharedGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGrid")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
