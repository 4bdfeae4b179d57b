pub mod contract_error;

pub use contract_error::{ContractError, ErrorKind};

pub type Result<T> = std::result::Result<T, ContractError>;
