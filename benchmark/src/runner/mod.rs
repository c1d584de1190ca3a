//! @ai:module:intent Scenario execution in semantic and naive mode
//! @ai:module:layer application
//! @ai:module:public_api DualModeExecutor, Mode, OperationResult, ModePair, MemoryProbe

pub mod executor;
pub mod probe;
pub mod result;

pub use executor::{DualModeExecutor, SemanticQuery};
pub use probe::MemoryProbe;
pub use result::{Mode, ModePair, OperationResult};
