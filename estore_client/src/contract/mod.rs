pub mod artifact;
pub mod registry;
pub mod store;

pub use artifact::{parse_address, ContractArtifact, NetworkDeployment};
pub use registry::ContractRegistry;
pub use store::{
    EthersStore, ProductEntry, StoreContract, WriteReceipt, ADD_PRODUCT_METHOD,
    PRODUCT_INDEX_METHOD,
};
