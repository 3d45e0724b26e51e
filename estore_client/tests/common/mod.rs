//! In-memory store standing in for the deployed contract

use async_trait::async_trait;
use estore_client::contract::{ProductEntry, StoreContract, WriteReceipt};
use estore_client::error::{ClientError, Result};
use ethers::types::{H256, U256};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

pub struct MockStore {
    /// Products whose write reverts
    reverting: HashSet<String>,
    /// Every write call received, in arrival order
    calls: Mutex<Vec<ProductEntry>>,
    /// Counter mirrored from the contract's productIndex
    index: AtomicU64,
    reads: AtomicUsize,
    /// When set, each write waits for a permit before completing
    gate: Option<Semaphore>,
}

impl MockStore {
    pub fn new(prior_index: u64) -> Self {
        Self {
            reverting: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            index: AtomicU64::new(prior_index),
            reads: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn reverting(mut self, name: &str) -> Self {
        self.reverting.insert(name.to_string());
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn calls(&self) -> Vec<ProductEntry> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn index(&self) -> u64 {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreContract for MockStore {
    async fn add_product_to_store(&self, entry: &ProductEntry) -> Result<WriteReceipt> {
        self.calls.lock().unwrap().push(entry.clone());

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ClientError::Provider(e.to_string()))?
                .forget();
        }

        let tx_hash = H256::from_low_u64_be(self.calls.lock().unwrap().len() as u64);
        if self.reverting.contains(&entry.name) {
            return Err(ClientError::Reverted { tx_hash });
        }

        let index = self.index.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(WriteReceipt {
            tx_hash,
            block_number: Some(index),
            gas_used: Some(U256::from(180_000u64)),
        })
    }

    async fn product_index(&self) -> Result<U256> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(U256::from(self.index()))
    }
}
