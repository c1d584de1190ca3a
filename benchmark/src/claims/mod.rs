//! @ai:module:intent Published claims and their validation
//! @ai:module:layer application
//! @ai:module:public_api ClaimThreshold, Metric, Comparison, default_claims, ClaimsValidator, Verdict, VerdictState

pub mod threshold;
pub mod validator;

pub use threshold::{default_claims, ClaimThreshold, Comparison, Metric};
pub use validator::{ClaimsValidator, ClaimsValidatorTrait, Verdict, VerdictState};
