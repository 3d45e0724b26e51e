//! Truffle build artifact
//!
//! The compile/deploy toolchain writes one JSON file per contract holding
//! the ABI and the address of every network the contract was migrated to.

use crate::error::{ClientError, Result};
use ethers::abi::Abi;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Deployment record of one network
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    pub address: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

/// Compiled contract interface plus its deployments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: Abi,
    /// Deployments keyed by network id
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkDeployment>,
}

impl ContractArtifact {
    /// Read and parse an artifact file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Artifact(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let artifact: ContractArtifact = serde_json::from_str(raw)?;
        if artifact.contract_name.is_empty() {
            return Err(ClientError::Artifact("artifact has no contractName".to_string()));
        }
        Ok(artifact)
    }

    /// Address the contract was deployed to on `network_id`
    pub fn deployed_address(&self, network_id: &str) -> Result<Address> {
        let deployment = self
            .networks
            .get(network_id)
            .ok_or_else(|| ClientError::NotDeployed {
                contract: self.contract_name.clone(),
                network: network_id.to_string(),
            })?;
        parse_address(&deployment.address)
    }

    /// Whether the ABI declares a function with this name
    pub fn has_function(&self, name: &str) -> bool {
        self.abi.functions.contains_key(name)
    }
}

/// Parse a hex address, with or without the `0x` prefix
pub fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| ClientError::InvalidAddress(format!("{}: {}", raw, e)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const STORE_ARTIFACT: &str = r#"{
        "contractName": "EcommerceStore",
        "abi": [
            {
                "constant": false,
                "inputs": [
                    {"name": "_name", "type": "string"},
                    {"name": "_category", "type": "string"},
                    {"name": "_imageLink", "type": "string"},
                    {"name": "_descLink", "type": "string"},
                    {"name": "_auctionStartTime", "type": "uint256"},
                    {"name": "_auctionEndTime", "type": "uint256"},
                    {"name": "_startPrice", "type": "uint256"},
                    {"name": "_productCondition", "type": "uint256"}
                ],
                "name": "addProductToStore",
                "outputs": [],
                "payable": false,
                "stateMutability": "nonpayable",
                "type": "function"
            },
            {
                "constant": true,
                "inputs": [],
                "name": "productIndex",
                "outputs": [{"name": "", "type": "uint256"}],
                "payable": false,
                "stateMutability": "view",
                "type": "function"
            }
        ],
        "networks": {
            "5777": {
                "events": {},
                "links": {},
                "address": "0x345ca3e014aaf5dca488057592ee47305d9b3e10",
                "transactionHash": "0x7f1b6d0d1c9f3c3b2b4e8a4f4d1c2b3a4f5e6d7c8b9a0f1e2d3c4b5a69788796"
            }
        }
    }"#;

    #[test]
    fn parses_truffle_artifact() {
        let artifact = ContractArtifact::from_json(STORE_ARTIFACT).unwrap();
        assert_eq!(artifact.contract_name, "EcommerceStore");
        assert!(artifact.has_function("addProductToStore"));
        assert!(artifact.has_function("productIndex"));
        assert!(!artifact.has_function("buy"));

        let address = artifact.deployed_address("5777").unwrap();
        assert_eq!(
            address,
            "0x345ca3e014aaf5dca488057592ee47305d9b3e10".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn unknown_network_is_not_deployed() {
        let artifact = ContractArtifact::from_json(STORE_ARTIFACT).unwrap();
        match artifact.deployed_address("1") {
            Err(ClientError::NotDeployed { contract, network }) => {
                assert_eq!(contract, "EcommerceStore");
                assert_eq!(network, "1");
            }
            other => panic!("expected NotDeployed, got {:?}", other),
        }
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EcommerceStore.json");
        std::fs::write(&path, STORE_ARTIFACT).unwrap();
        assert!(ContractArtifact::load(&path).is_ok());
        assert!(matches!(
            ContractArtifact::load(dir.path().join("missing.json")),
            Err(ClientError::Artifact(_))
        ));
    }

    #[test]
    fn bad_addresses_are_rejected() {
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address(" 0x345ca3e014aaf5dca488057592ee47305d9b3e10 ").is_ok());
    }
}
