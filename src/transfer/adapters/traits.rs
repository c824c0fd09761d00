//! Collaborator traits for the transfer flow
//!
//! Settlement and OTP delivery sit behind traits so the session logic runs the
//! same against a simulated backend, a scripted mock, or a real service.

use crate::formatter::mask_account;
use crate::transfer::types::TransferRequest;

/// Result of asking the backend to move the money
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementResult {
    Settled,
    /// Backend refused; the message goes to the result screen
    Declined(String),
}

pub trait SettlementBackend {
    /// Called once per transfer, after the OTP and detail checks pass
    fn settle(&mut self, request: &TransferRequest) -> SettlementResult;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Settles every transfer
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysSettle;

impl SettlementBackend for AlwaysSettle {
    fn settle(&mut self, request: &TransferRequest) -> SettlementResult {
        log::debug!(
            "[always] settle(account={}, amount={})",
            mask_account(&request.target_account),
            request.amount
        );
        SettlementResult::Settled
    }

    fn name(&self) -> &str {
        "always"
    }
}

/// Sends the issued code to the user
pub trait OtpDelivery {
    fn deliver(&mut self, request: &TransferRequest, code: &str);
}

/// Writes the code to the debug log instead of sending it anywhere
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDelivery;

impl OtpDelivery for LogDelivery {
    fn deliver(&mut self, request: &TransferRequest, code: &str) {
        log::debug!(
            "OTP for testing: {} (account={})",
            code,
            mask_account(&request.target_account)
        );
    }
}
