use crate::config::ContractConfig;
use crate::contract::artifact::{parse_address, ContractArtifact};
use crate::contract::store::{bind_store, default_sender, EthersStore, ADD_PRODUCT_METHOD, PRODUCT_INDEX_METHOD};
use crate::error::{ClientError, Result};
use crate::provider::ProviderHandle;
use ethers::providers::Middleware;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Lazily resolved contract references, cached by contract name
pub struct ContractRegistry {
    /// Resolved provider every binding goes through
    provider: Arc<ProviderHandle>,
    /// Binding settings of the store contract
    settings: ContractConfig,
    /// Bindings resolved so far
    bound: Mutex<HashMap<String, Arc<EthersStore>>>,
}

impl ContractRegistry {
    pub fn new(provider: Arc<ProviderHandle>, settings: ContractConfig) -> Self {
        Self {
            provider,
            settings,
            bound: Mutex::new(HashMap::new()),
        }
    }

    /// The deployed store instance, resolved on first use
    pub async fn store(&self) -> Result<Arc<EthersStore>> {
        let mut bound = self.bound.lock().await;
        if let Some(store) = bound.get(&self.settings.name) {
            return Ok(store.clone());
        }

        let store = Arc::new(self.resolve_store().await?);
        bound.insert(self.settings.name.clone(), store.clone());
        Ok(store)
    }

    async fn resolve_store(&self) -> Result<EthersStore> {
        let artifact = ContractArtifact::load(&self.settings.artifact_path)?;
        if artifact.contract_name != self.settings.name {
            return Err(ClientError::Artifact(format!(
                "{} holds {}, expected {}",
                self.settings.artifact_path.display(),
                artifact.contract_name,
                self.settings.name
            )));
        }
        for method in [ADD_PRODUCT_METHOD, PRODUCT_INDEX_METHOD] {
            if !artifact.has_function(method) {
                return Err(ClientError::Abi(format!(
                    "{} does not declare {}",
                    artifact.contract_name, method
                )));
            }
        }

        let provider = self.provider.provider();

        let address = match &self.settings.address {
            Some(address) => parse_address(address)?,
            None => {
                let network_id = match &self.settings.network_id {
                    Some(id) => id.clone(),
                    None => provider.get_net_version().await?,
                };
                artifact.deployed_address(&network_id)?
            }
        };

        let sender = match &self.settings.from {
            Some(from) => parse_address(from)?,
            None => default_sender(&provider).await?,
        };

        info!(
            "Bound {} at {:?} (sender {:?})",
            artifact.contract_name, address, sender
        );

        Ok(bind_store(artifact.abi, address, provider, sender))
    }
}
