//! Adapters module - settlement backends and OTP delivery

pub mod traits;
pub mod mock;
pub mod simulated;

pub use traits::{AlwaysSettle, LogDelivery, OtpDelivery, SettlementBackend, SettlementResult};
pub use mock::{FixedOtpSource, MockSettlement};
pub use simulated::SimulatedSettlement;
