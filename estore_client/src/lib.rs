//! EcommerceStore contract client
//!
//! Resolves a single ledger provider for the process, binds the deployed
//! `EcommerceStore` contract from its build artifact and seeds it with a
//! catalog of sample products, confirming the result with a read of the
//! contract's product index.

pub mod config;
pub mod contract;
pub mod error;
pub mod provider;
pub mod seed;
pub mod units;

pub use config::Config;
pub use contract::{
    ContractArtifact, ContractRegistry, EthersStore, ProductEntry, StoreContract, WriteReceipt,
};
pub use error::{ClientError, Result};
pub use provider::{AmbientProvider, ProviderHandle, ProviderOrigin, ProviderResolver};
pub use seed::{Catalog, CallState, SeedReport, SeedWindow, SeedingClient, SettlePolicy};
pub use units::{from_wei, one_ether, to_wei, EtherUnit};
