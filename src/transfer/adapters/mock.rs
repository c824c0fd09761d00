//! Mock collaborators for testing
//!
//! Allows scripting settlement results and the codes the OTP source hands out.

use std::collections::VecDeque;

use super::traits::{SettlementBackend, SettlementResult};
use crate::formatter::mask_account;
use crate::transfer::otp::OtpSource;
use crate::transfer::types::TransferRequest;

/// Mock settlement backend
pub struct MockSettlement {
    /// Results consumed in order, one per settle call
    scripted: VecDeque<SettlementResult>,
    /// Result once the script runs out
    default_result: SettlementResult,
    settled: Vec<TransferRequest>,
}

impl MockSettlement {
    pub fn new() -> Self {
        Self {
            scripted: VecDeque::new(),
            default_result: SettlementResult::Settled,
            settled: Vec::new(),
        }
    }

    /// Queue a result for the next settle call
    pub fn push_result(mut self, result: SettlementResult) -> Self {
        self.scripted.push_back(result);
        self
    }

    /// Set default result for all calls
    pub fn with_default_result(mut self, result: SettlementResult) -> Self {
        self.default_result = result;
        self
    }

    /// Requests seen so far
    pub fn calls(&self) -> &[TransferRequest] {
        &self.settled
    }
}

impl Default for MockSettlement {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementBackend for MockSettlement {
    fn settle(&mut self, request: &TransferRequest) -> SettlementResult {
        log::debug!(
            "[mock] settle(account={}, amount={})",
            mask_account(&request.target_account),
            request.amount
        );
        self.settled.push(request.clone());
        self.scripted.pop_front().unwrap_or_else(|| self.default_result.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// OTP source that hands out a fixed sequence of codes, cycling at the end
pub struct FixedOtpSource {
    codes: Vec<String>,
    next: usize,
}

impl FixedOtpSource {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        Self { codes, next: 0 }
    }
}

impl OtpSource for FixedOtpSource {
    fn next_code(&mut self) -> String {
        if self.codes.is_empty() {
            return "000000".to_string();
        }
        let code = self.codes[self.next % self.codes.len()].clone();
        self.next += 1;
        code
    }
}
