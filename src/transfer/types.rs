//! Core types for the transfer flow
//!
//! Amounts are whole rupiah held in `u64`; there is no minor unit.

use serde::{Deserialize, Serialize};

use crate::transfer::error::TransferError;
use crate::transfer::otp::OtpState;

/// Smallest amount accepted by the form
pub const MIN_TRANSFER_AMOUNT: u64 = 10_000;
/// Largest amount accepted by the form
pub const MAX_TRANSFER_AMOUNT: u64 = 50_000_000;
/// Target account numbers are exactly this many decimal digits
pub const ACCOUNT_NUMBER_LEN: usize = 10;
/// Default starting balance and daily limit
pub const DEFAULT_BALANCE: u64 = 100_000_000;
pub const DEFAULT_DAILY_LIMIT: u64 = 100_000_000;

/// Values injected at session construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub balance: u64,
    pub daily_limit: u64,
    /// Run account/balance/limit checks on submit as well as after the OTP
    #[serde(default)]
    pub upfront_checks: bool,
}

impl Settings {
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.daily_limit == 0 {
            return Err(TransferError::InvalidSettings(
                "limit harian harus lebih dari 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            balance: DEFAULT_BALANCE,
            daily_limit: DEFAULT_DAILY_LIMIT,
            upfront_checks: false,
        }
    }
}

/// A transfer as entered on the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub target_account: String,
    pub amount: u64,
    pub notes: Option<String>,
}

impl TransferRequest {
    pub fn new(target_account: &str, amount: u64, notes: Option<&str>) -> Self {
        let notes = notes.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string);
        Self {
            target_account: target_account.trim().to_string(),
            amount,
            notes,
        }
    }
}

/// Balances and counters for one user session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current_balance: u64,
    pub daily_limit: u64,
    pub used_limit: u64,
    pub otp: OtpState,
}

impl SessionState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            current_balance: settings.balance,
            daily_limit: settings.daily_limit,
            used_limit: 0,
            otp: OtpState::Idle,
        }
    }

    /// Headroom left under the daily limit
    pub fn remaining_limit(&self) -> u64 {
        self.daily_limit.saturating_sub(self.used_limit)
    }

    pub fn otp_attempts_remaining(&self) -> u8 {
        self.otp.attempts_remaining()
    }

    /// The code the user is expected to type, if one is outstanding
    pub fn generated_otp(&self) -> Option<&str> {
        self.otp.code()
    }
}

/// What the result screen shows after a settled transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub target_account: String,
    pub amount: u64,
    pub notes: Option<String>,
    pub balance_after: u64,
    pub used_limit_after: u64,
    pub settled_at: i64,
}

/// Terminal outcome of a transfer that reached the result screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    Success(TransferReceipt),
    Failure { message: String },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Message for the result screen
    pub fn message(&self) -> String {
        match self {
            Self::Success(receipt) => format!(
                "Transfer sebesar {} ke rekening {} berhasil! Saldo Anda: {}",
                crate::formatter::format_amount(receipt.amount),
                receipt.target_account,
                crate::formatter::format_amount(receipt.balance_after)
            ),
            Self::Failure { message } => message.clone(),
        }
    }
}
