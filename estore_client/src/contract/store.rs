//! EcommerceStore call interface
//!
//! Only the call shape of the deployed contract is known here: one write
//! that appends a product and one read of the product counter.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use ethers::contract::Contract;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, H256, U256, U64};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Write method appending a product
pub const ADD_PRODUCT_METHOD: &str = "addProductToStore";

/// Read method returning the product counter
pub const PRODUCT_INDEX_METHOD: &str = "productIndex";

/// Positional arguments of one `addProductToStore` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub category: String,
    pub image_link: String,
    pub desc_link: String,
    /// Unix seconds
    pub start_time: u64,
    /// Unix seconds
    pub end_time: u64,
    /// Price in wei
    pub price: U256,
    /// Product status flag
    pub status: u64,
}

impl ProductEntry {
    /// ABI argument tuple in contract order
    pub fn call_args(&self) -> (String, String, String, String, U256, U256, U256, U256) {
        (
            self.name.clone(),
            self.category.clone(),
            self.image_link.clone(),
            self.desc_link.clone(),
            U256::from(self.start_time),
            U256::from(self.end_time),
            self.price,
            U256::from(self.status),
        )
    }
}

/// Receipt of a mined write call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
}

/// Call interface of the deployed store
#[async_trait]
pub trait StoreContract: Send + Sync {
    /// Submit `addProductToStore` and wait for its receipt
    async fn add_product_to_store(&self, entry: &ProductEntry) -> Result<WriteReceipt>;

    /// Read the current `productIndex`
    async fn product_index(&self) -> Result<U256>;
}

/// Store bound through an ethers contract instance
pub struct EthersStore {
    contract: Contract<Provider<Http>>,
    sender: Address,
}

impl EthersStore {
    pub fn new(contract: Contract<Provider<Http>>, sender: Address) -> Self {
        Self { contract, sender }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn sender(&self) -> Address {
        self.sender
    }
}

#[async_trait]
impl StoreContract for EthersStore {
    async fn add_product_to_store(&self, entry: &ProductEntry) -> Result<WriteReceipt> {
        let call = self
            .contract
            .method::<_, ()>(ADD_PRODUCT_METHOD, entry.call_args())
            .map_err(|e| ClientError::Abi(e.to_string()))?
            .from(self.sender);

        let pending = call
            .send()
            .await
            .map_err(|e| ClientError::Contract(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        debug!("{} submitted for {}: {:?}", ADD_PRODUCT_METHOD, entry.name, tx_hash);

        let receipt = pending.await?.ok_or(ClientError::Dropped { tx_hash })?;
        if receipt.status == Some(U64::from(0)) {
            return Err(ClientError::Reverted { tx_hash });
        }

        Ok(WriteReceipt {
            tx_hash,
            block_number: receipt.block_number.map(|n| n.as_u64()),
            gas_used: receipt.gas_used,
        })
    }

    async fn product_index(&self) -> Result<U256> {
        self.contract
            .method::<_, U256>(PRODUCT_INDEX_METHOD, ())
            .map_err(|e| ClientError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| ClientError::Contract(e.to_string()))
    }
}

/// First unlocked account of the node, the default sender on development networks
pub async fn default_sender(provider: &Provider<Http>) -> Result<Address> {
    let accounts = provider.get_accounts().await?;
    accounts
        .first()
        .copied()
        .ok_or_else(|| ClientError::Config("provider exposes no unlocked accounts".to_string()))
}

/// Build the ethers store for an address
pub fn bind_store(
    abi: ethers::abi::Abi,
    address: Address,
    provider: Arc<Provider<Http>>,
    sender: Address,
) -> EthersStore {
    EthersStore::new(Contract::new(address, abi, provider), sender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::artifact::tests::STORE_ARTIFACT;
    use crate::contract::artifact::ContractArtifact;

    fn sample_entry() -> ProductEntry {
        ProductEntry {
            name: "iphone6".to_string(),
            category: "Cell Phones & Accessories".to_string(),
            image_link: "imagelink".to_string(),
            desc_link: "desclink".to_string(),
            start_time: 1_700_000_000,
            end_time: 1_700_000_300,
            price: crate::units::one_ether(),
            status: 0,
        }
    }

    #[test]
    fn call_args_follow_contract_order() {
        let (name, category, image, desc, start, end, price, status) = sample_entry().call_args();
        assert_eq!(name, "iphone6");
        assert_eq!(category, "Cell Phones & Accessories");
        assert_eq!(image, "imagelink");
        assert_eq!(desc, "desclink");
        assert_eq!(start, U256::from(1_700_000_000u64));
        assert_eq!(end - start, U256::from(300u64));
        assert_eq!(price, crate::units::one_ether());
        assert_eq!(status, U256::zero());
    }

    #[test]
    fn call_args_encode_against_the_abi() {
        let artifact = ContractArtifact::from_json(STORE_ARTIFACT).unwrap();
        let function = artifact.abi.function(ADD_PRODUCT_METHOD).unwrap();
        let tokens = ethers::abi::Tokenize::into_tokens(sample_entry().call_args());
        assert_eq!(tokens.len(), 8);
        assert!(function.encode_input(&tokens).is_ok());
    }

    #[test]
    fn binding_keeps_address_and_sender() {
        let artifact = ContractArtifact::from_json(STORE_ARTIFACT).unwrap();
        let address = artifact.deployed_address("5777").unwrap();
        let provider = Arc::new(Provider::<Http>::try_from("http://localhost:8545").unwrap());
        let sender = Address::repeat_byte(0x11);

        let store = bind_store(artifact.abi, address, provider, sender);
        assert_eq!(store.address(), address);
        assert_eq!(store.sender(), sender);
    }
}
