//! The replicated document.
//!
//! [`SyncDoc`] owns a yrs [`Doc`] with a single root map named
//! [`ROOT_NAME`]. Everything the document holds lives under that map:
//! patches address it with JSON Pointers, and [`SyncDoc::state`] reads it
//! back as a [`Value`].
//!
//! - [`navigate`]: pointer resolution against the live tree.
//! - [`apply`]: patch operations.
//! - [`sync`]: history blobs exchanged between replicas.

pub mod apply;
pub mod container;
pub mod convert;
pub mod navigate;
pub mod sync;

use std::fmt;

use yrs::{Doc, Map as _, MapRef, Transact, Transaction, TransactionMut};

use crate::error::{Error, Result};
use crate::value::Value;

pub use container::{Container, ContainerKind, Terminal};

/// Name of the root map inside the yrs document.
pub const ROOT_NAME: &str = "root";

/// Construction options for [`SyncDoc`].
#[derive(Debug, Clone, Default)]
pub struct DocOptions {
    /// Pin the replica's client id. Replicas that edit concurrently must
    /// have distinct ids; `None` lets the engine pick a random one.
    pub client_id: Option<u64>,
}

/// A replica of the synchronized JSON document.
pub struct SyncDoc {
    doc: Doc,
    root: MapRef,
}

impl SyncDoc {
    pub fn new() -> Self {
        SyncDoc::with_options(DocOptions::default())
    }

    pub fn with_options(options: DocOptions) -> Self {
        let doc = match options.client_id {
            Some(id) => Doc::with_client_id(id),
            None => Doc::new(),
        };
        let root = doc.get_or_insert_map(ROOT_NAME);
        SyncDoc { doc, root }
    }

    pub fn client_id(&self) -> u64 {
        self.doc.client_id()
    }

    pub(crate) fn read_txn(&self) -> Result<Transaction<'_>> {
        self.doc
            .try_transact()
            .map_err(|e| Error::Engine(format!("cannot open read transaction: {e}")))
    }

    pub(crate) fn write_txn(&self) -> Result<TransactionMut<'_>> {
        self.doc
            .try_transact_mut()
            .map_err(|e| Error::Engine(format!("cannot open write transaction: {e}")))
    }

    /// Read the whole document. Always a [`Value::Map`].
    pub fn state(&self) -> Result<Value> {
        let txn = self.read_txn()?;
        convert::read_map(&txn, &self.root)
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(self.state()?.into())
    }

    /// Create or overwrite a single root entry in its own transaction.
    pub fn set_root_key(&self, key: &str, value: &Value) -> Result<()> {
        let mut txn = self.write_txn()?;
        self.root.insert(&mut txn, key, convert::to_input(value));
        Ok(())
    }
}

impl Default for SyncDoc {
    fn default() -> Self {
        SyncDoc::new()
    }
}

impl fmt::Debug for SyncDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncDoc")
            .field("client_id", &self.client_id())
            .finish_non_exhaustive()
    }
}
