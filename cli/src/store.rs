use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Instant;

use category_graph_core::{
    Category, CategoryError, CategoryId, CategoryStore, MemoryStore, SimilarityEdge,
};
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// On-disk layout of the data file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(default)]
    generation: u64,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    similarities: Vec<SimilarityEdge>,
}

/// Write-through store over a single JSON file.
///
/// The whole file is read on open and rewritten after every mutation. An
/// exclusive lock on the sidecar `<data>.lock` file is held from `open`
/// until the store is dropped, so concurrent invocations against the same
/// file run one after another and never overwrite each other's writes.
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    _lock: File,
}

impl JsonFileStore {
    /// Open `path`, or start empty if it does not exist yet.
    ///
    /// Blocks while another store holds the lock for the same file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref().to_path_buf();
        let start = Instant::now();
        let lock = acquire_lock(&path)?;

        let inner = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| CliError::io(&path, e))?;
            let data: DataFile =
                serde_json::from_str(&content).map_err(|e| CliError::json(&path, e))?;
            MemoryStore::from_records(data.categories, data.similarities, data.generation)?
        } else {
            tracing::debug!(path = %path.display(), "data file missing, starting empty");
            MemoryStore::new()
        };

        tracing::debug!(
            path = %path.display(),
            categories = inner.category_count(),
            similarities = inner.similarity_count(),
            load_time_ms = start.elapsed().as_secs_f64() * 1000.0,
            "data file loaded"
        );

        Ok(Self {
            path,
            inner,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Run a category mutation against the in-memory store, then persist.
    pub fn mutate<R>(
        &mut self,
        f: impl FnOnce(&mut MemoryStore) -> Result<R, CategoryError>,
    ) -> Result<R, CliError> {
        let result = f(&mut self.inner)?;
        self.save()?;
        Ok(result)
    }

    /// Rewrite the data file via a sibling temp file and rename.
    pub fn save(&self) -> Result<(), CliError> {
        let (categories, similarities) = self.inner.records();
        let data = DataFile {
            generation: self.inner.generation(),
            categories,
            similarities,
        };
        let json = serde_json::to_string_pretty(&data).map_err(|e| CliError::json(&self.path, e))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| CliError::io(dir, e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| CliError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| CliError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            generation = self.inner.generation(),
            "data file saved"
        );
        Ok(())
    }

    fn persist(&self) -> Result<(), CategoryError> {
        self.save()
            .map_err(|e| CategoryError::Storage(e.to_string()))
    }
}

/// Path of the lock file guarding `path`.
fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn acquire_lock(path: &Path) -> Result<File, CliError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| CliError::io(dir, e))?;
    }
    let lock_path = lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| CliError::io(&lock_path, e))?;
    FileExt::lock_exclusive(&file).map_err(|e| CliError::io(&lock_path, e))?;
    tracing::trace!(path = %lock_path.display(), "data file locked");
    Ok(file)
}

impl CategoryStore for JsonFileStore {
    fn list_categories(&self) -> Result<Vec<Category>, CategoryError> {
        self.inner.list_categories()
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, CategoryError> {
        self.inner.get_category(id)
    }

    fn list_similarity_edges(&self) -> Result<Vec<SimilarityEdge>, CategoryError> {
        self.inner.list_similarity_edges()
    }

    fn insert_similarity_edge(&mut self, edge: SimilarityEdge) -> Result<(), CategoryError> {
        self.inner.insert_similarity_edge(edge)?;
        self.persist()
    }

    fn delete_similarity_edge(&mut self, edge: SimilarityEdge) -> Result<(), CategoryError> {
        self.inner.delete_similarity_edge(edge)?;
        self.persist()
    }

    fn generation(&self) -> u64 {
        self.inner.generation()
    }
}
