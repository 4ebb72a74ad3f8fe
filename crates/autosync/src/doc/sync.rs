//! Causal-history exchange between replicas.
//!
//! Blobs are yrs update format v1 and opaque to callers. Merging is
//! commutative and idempotent: replicas that have merged the same set of
//! blobs hold the same state, whatever the order.

use tracing::{debug, warn};
use yrs::updates::decoder::Decode;
use yrs::updates::encoder::Encode;
use yrs::{ReadTxn, StateVector, Update};

use super::SyncDoc;
use crate::error::{Error, Result};

impl SyncDoc {
    /// Encode the full history of this replica.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        let txn = self.read_txn()?;
        let bytes = txn.encode_state_as_update_v1(&StateVector::default());
        debug!(bytes = bytes.len(), "encoded snapshot");
        Ok(bytes)
    }

    /// Encode this replica's state vector: a compact summary of which
    /// operations it has seen, for a peer to pass to [`snapshot_since`].
    ///
    /// [`snapshot_since`]: SyncDoc::snapshot_since
    pub fn state_vector(&self) -> Result<Vec<u8>> {
        let txn = self.read_txn()?;
        Ok(txn.state_vector().encode_v1())
    }

    /// Encode only the history a peer with `remote_state_vector` is missing.
    /// An empty state vector means the peer has seen nothing.
    pub fn snapshot_since(&self, remote_state_vector: &[u8]) -> Result<Vec<u8>> {
        let remote = if remote_state_vector.is_empty() {
            StateVector::default()
        } else {
            StateVector::decode_v1(remote_state_vector).map_err(|e| {
                warn!(error = %e, bytes = remote_state_vector.len(), "state vector decode failed");
                Error::Engine(format!("cannot decode state vector: {e}"))
            })?
        };
        let txn = self.read_txn()?;
        let bytes = txn.encode_state_as_update_v1(&remote);
        debug!(bytes = bytes.len(), "encoded delta snapshot");
        Ok(bytes)
    }

    /// Merge a blob produced by [`snapshot`](SyncDoc::snapshot) or
    /// [`snapshot_since`](SyncDoc::snapshot_since) on any replica.
    /// Empty input is a no-op.
    pub fn merge(&self, update: &[u8]) -> Result<()> {
        if update.is_empty() {
            debug!("empty update, nothing to merge");
            return Ok(());
        }
        let decoded = Update::decode_v1(update).map_err(|e| {
            warn!(error = %e, bytes = update.len(), "update decode failed");
            Error::Engine(format!("cannot decode update: {e}"))
        })?;
        let mut txn = self.write_txn()?;
        txn.apply_update(decoded)
            .map_err(|e| Error::Engine(format!("cannot apply update: {e}")))?;
        debug!(bytes = update.len(), "merged update");
        Ok(())
    }
}
