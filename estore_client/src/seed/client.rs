use crate::contract::{ProductEntry, StoreContract, WriteReceipt};
use crate::error::{ClientError, Result};
use ethers::types::U256;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// When the index read is issued relative to the write batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlePolicy {
    /// Await every write before reading the index
    #[default]
    JoinWrites,
    /// Read right after submitting the batch; the index may miss writes still in flight
    Detached,
}

/// Terminal state of one call. Calls are never retried; a call still in
/// flight is only visible as a running task.
#[derive(Debug)]
pub enum CallState<T> {
    Fulfilled(T),
    Rejected(ClientError),
}

impl<T> CallState<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, CallState::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, CallState::Rejected(_))
    }

    fn settle(result: Result<T>) -> Self {
        match result {
            Ok(value) => CallState::Fulfilled(value),
            Err(err) => CallState::Rejected(err),
        }
    }
}

/// Outcome of one write of the batch
#[derive(Debug)]
pub struct WriteOutcome {
    pub entry: ProductEntry,
    pub state: CallState<WriteReceipt>,
}

/// Result of a seeding run
#[derive(Debug)]
pub struct SeedReport {
    /// Writes in submission order
    pub writes: Vec<WriteOutcome>,
    /// The confirmatory `productIndex` read
    pub index: CallState<U256>,
    /// Writes still in flight when the index read was issued
    pub pending_at_read: usize,
    pub policy: SettlePolicy,
}

impl SeedReport {
    pub fn fulfilled(&self) -> usize {
        self.writes.iter().filter(|w| w.state.is_fulfilled()).count()
    }

    pub fn rejected(&self) -> usize {
        self.writes.iter().filter(|w| w.state.is_rejected()).count()
    }
}

/// Populates a deployed store with a batch of products
pub struct SeedingClient {
    store: Arc<dyn StoreContract>,
    policy: SettlePolicy,
}

impl SeedingClient {
    pub fn new(store: Arc<dyn StoreContract>, policy: SettlePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> SettlePolicy {
        self.policy
    }

    /// Issue one independent write per entry, then read the product index.
    ///
    /// A failing write never stops its siblings or the read.
    pub async fn seed(&self, entries: Vec<ProductEntry>) -> SeedReport {
        info!("Seeding {} products ({:?})", entries.len(), self.policy);

        let handles: Vec<(ProductEntry, JoinHandle<Result<WriteReceipt>>)> = entries
            .into_iter()
            .map(|entry| {
                let store = self.store.clone();
                let call_entry = entry.clone();
                let handle = tokio::spawn(async move {
                    let result = store.add_product_to_store(&call_entry).await;
                    report_write(&call_entry, &result);
                    result
                });
                (entry, handle)
            })
            .collect();

        let (writes, index, pending_at_read) = match self.policy {
            SettlePolicy::JoinWrites => {
                let writes = settle_writes(handles).await;
                let index = self.read_index().await;
                (writes, index, 0)
            }
            SettlePolicy::Detached => {
                let pending = handles.iter().filter(|(_, h)| !h.is_finished()).count();
                if pending > 0 {
                    warn!(
                        "Reading product index with {} writes still in flight",
                        pending
                    );
                }
                let index = self.read_index().await;
                let writes = settle_writes(handles).await;
                (writes, index, pending)
            }
        };

        let report = SeedReport {
            writes,
            index,
            pending_at_read,
            policy: self.policy,
        };
        info!(
            "Seeding finished: {} fulfilled, {} rejected",
            report.fulfilled(),
            report.rejected()
        );
        report
    }

    async fn read_index(&self) -> CallState<U256> {
        let result = self.store.product_index().await;
        match &result {
            Ok(index) => info!("productIndex = {}", index),
            Err(err) => error!("productIndex read failed: {}", err),
        }
        CallState::settle(result)
    }
}

async fn settle_writes(
    handles: Vec<(ProductEntry, JoinHandle<Result<WriteReceipt>>)>,
) -> Vec<WriteOutcome> {
    let (entries, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
    let results = futures::future::join_all(handles).await;

    entries
        .into_iter()
        .zip(results)
        .map(|(entry, joined)| {
            let result = joined.map_err(ClientError::from).and_then(|r| r);
            WriteOutcome {
                entry,
                state: CallState::settle(result),
            }
        })
        .collect()
}

fn report_write(entry: &ProductEntry, result: &Result<WriteReceipt>) {
    match result {
        Ok(receipt) => info!(
            "{} added: tx {:?} block {:?}",
            entry.name, receipt.tx_hash, receipt.block_number
        ),
        Err(err) => error!("{} failed: {}", entry.name, err),
    }
}
