//! # Persistence Writer
//!
//! Background task that writes changed collections to SQLite.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command ──► StoreState::with_store_mut                                 │
//! │                 │  store.drain_changes() = [Sales, SaleLogs, Customers] │
//! │                 ▼                                                       │
//! │              PersistHandle::save(snapshot, changes)   (never blocks)    │
//! │                 │  unbounded mpsc, FIFO                                 │
//! │                 ▼                                                       │
//! │              writer task: save_collection(db, snapshot, c) for each c   │
//! │                 └── failure → error! log, the caller never sees it      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Saves are queued while the store lock is held, so the writer sees them in
//! mutation order and the last write of a collection is always the newest.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use verdant_core::{Collection, StoreSnapshot};
use verdant_db::{save_collection, Database};

enum PersistCommand {
    Save {
        snapshot: Arc<StoreSnapshot>,
        collections: Vec<Collection>,
    },
    /// Replies once every earlier save has been attempted.
    Flush(oneshot::Sender<()>),
}

/// Handle for queueing saves on the writer task.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    cmd_tx: mpsc::UnboundedSender<PersistCommand>,
}

impl std::fmt::Debug for PersistCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistCommand::Save { collections, .. } => {
                f.debug_struct("Save").field("collections", collections).finish()
            }
            PersistCommand::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl PersistHandle {
    /// Spawns the writer task. Must be called inside a Tokio runtime.
    pub fn start(db: Database) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            run(db, cmd_rx).await;
        });

        PersistHandle { cmd_tx }
    }

    /// Queues `collections` of `snapshot` for writing.
    pub fn save(&self, snapshot: StoreSnapshot, collections: Vec<Collection>) {
        let command = PersistCommand::Save {
            snapshot: Arc::new(snapshot),
            collections,
        };
        if let Err(e) = self.cmd_tx.send(command) {
            warn!(command = ?e.0, "Persistence writer stopped, changes not saved");
        }
    }

    /// Waits until every save queued so far has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.cmd_tx.send(PersistCommand::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run(db: Database, mut cmd_rx: mpsc::UnboundedReceiver<PersistCommand>) {
    debug!("Persistence writer started");

    while let Some(command) = cmd_rx.recv().await {
        match command {
            PersistCommand::Save {
                snapshot,
                collections,
            } => {
                for collection in collections {
                    if let Err(e) = save_collection(&db, &snapshot, collection).await {
                        error!(
                            collection = collection.as_str(),
                            error = %e,
                            "Failed to persist collection"
                        );
                    }
                }
            }
            PersistCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Persistence writer stopped");
}
