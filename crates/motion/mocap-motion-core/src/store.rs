//! Arena of loaded motion tables keyed by id.

use std::sync::Arc;

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::config::IngestConfig;
use crate::ids::TableId;
use crate::table::MotionTable;
use crate::tabular::{self, Cell};
use crate::target::Reporter;
use crate::Result;

/// Read access to loaded tables by id, used when resolving serialized bindings.
pub trait TableLookup {
    fn table(&self, id: &TableId) -> Option<Arc<MotionTable>>;
}

impl TableLookup for HashMap<TableId, Arc<MotionTable>> {
    fn table(&self, id: &TableId) -> Option<Arc<MotionTable>> {
        self.get(id).cloned()
    }
}

/// Owns every loaded table and hands out shared, read-only handles.
#[derive(Debug, Default)]
pub struct TableStore {
    tables: IndexMap<TableId, Arc<MotionTable>>,
    config: IngestConfig,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that parses incoming rows with `config`.
    pub fn with_config(config: IngestConfig) -> Self {
        Self {
            tables: IndexMap::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Add a built table, replacing any table with the same id.
    pub fn insert(&mut self, table: MotionTable) -> Arc<MotionTable> {
        let handle = Arc::new(table);
        self.tables.insert(handle.id().clone(), handle.clone());
        handle
    }

    pub fn get(&self, id: &TableId) -> Option<Arc<MotionTable>> {
        self.tables.get(id).cloned()
    }

    /// Forget a table. Bindings holding its handle keep it alive.
    pub fn remove(&mut self, id: &TableId) -> Option<Arc<MotionTable>> {
        self.tables.shift_remove(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &TableId> {
        self.tables.keys()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Arc<MotionTable>> {
        self.tables.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Parse `rows` into a new named table. On failure the error goes to
    /// `reporter` and the store is left unchanged.
    pub fn ingest_rows(
        &mut self,
        rows: &[Vec<Cell>],
        name: &str,
        reporter: &dyn Reporter,
    ) -> Result<Arc<MotionTable>> {
        let table = MotionTable::from_rows_reported(rows, &self.config, reporter)?.with_name(name);
        log::debug!(
            "loaded motion table {} ({}): {} samples",
            table.name(),
            table.id(),
            table.time_axis().len()
        );
        Ok(self.insert(table))
    }

    /// [`TableStore::ingest_rows`] over CSV text.
    pub fn ingest_csv_text(
        &mut self,
        text: &str,
        name: &str,
        reporter: &dyn Reporter,
    ) -> Result<Arc<MotionTable>> {
        self.ingest_rows(&tabular::parse_csv_text(text), name, reporter)
    }
}

impl TableLookup for TableStore {
    fn table(&self, id: &TableId) -> Option<Arc<MotionTable>> {
        self.get(id)
    }
}
