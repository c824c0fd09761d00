//! Transfer module - main module file
//!
//! Form validation, OTP confirmation and balance bookkeeping for a single
//! user session, with settlement and persistence behind adapters.

pub mod adapters;
pub mod coordinator;
pub mod error;
pub mod otp;
pub mod state;
pub mod store;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use coordinator::TransferSession;
pub use error::TransferError;
pub use otp::{OtpSource, OtpState, RandomOtpSource};
pub use state::{FormEvent, FormPhase, ResultStatus};
pub use store::{KeyValueStore, MemoryStore, SettingsStore};
pub use types::{SessionState, Settings, TransferOutcome, TransferReceipt, TransferRequest};
pub use validator::{parse_amount, parse_grouped, validate_details, validate_form};
