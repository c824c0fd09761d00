//! Form State Machine
//!
//! Defines the screen states, events, and transition function for the
//! transfer form.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transfer::error::TransferError;

/// Outcome shown on the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Success,
    Failure,
}

/// Form FSM states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    /// Entering account and amount
    Form,
    /// Code issued, waiting for the user to type it
    AwaitingOtp,
    /// Transfer finished one way or the other
    Result(ResultStatus),
}

impl FormPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormPhase::Form => "form",
            FormPhase::AwaitingOtp => "awaiting_otp",
            FormPhase::Result(ResultStatus::Success) => "result_success",
            FormPhase::Result(ResultStatus::Failure) => "result_failure",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "form" => Some(FormPhase::Form),
            "awaiting_otp" => Some(FormPhase::AwaitingOtp),
            "result_success" => Some(FormPhase::Result(ResultStatus::Success)),
            "result_failure" => Some(FormPhase::Result(ResultStatus::Failure)),
            _ => None,
        }
    }

    /// Result screens only leave via a new transaction or reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, FormPhase::Result(_))
    }
}

impl fmt::Display for FormPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// FSM Events (user actions and their checked results)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// Form submitted with a valid amount
    Submit,
    /// Wrong code, attempts left
    OtpRejected,
    /// Wrong code, no attempts left
    OtpLocked,
    /// Code issued again
    Resend,
    /// Correct code but the detail checks failed
    DetailsRejected,
    /// Correct code and settlement went through
    Settled,
    /// Correct code but settlement was declined
    SettlementFailed,
    /// Explicit cancel from the OTP screen
    Back,
    /// "Transaksi baru" on the result screen
    NewTransaction,
    /// Clear everything, valid anywhere
    Reset,
}

impl FormEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormEvent::Submit => "submit",
            FormEvent::OtpRejected => "otp_rejected",
            FormEvent::OtpLocked => "otp_locked",
            FormEvent::Resend => "resend",
            FormEvent::DetailsRejected => "details_rejected",
            FormEvent::Settled => "settled",
            FormEvent::SettlementFailed => "settlement_failed",
            FormEvent::Back => "back",
            FormEvent::NewTransaction => "new_transaction",
            FormEvent::Reset => "reset",
        }
    }
}

/// State transition function
///
/// Given the current phase and an event, returns the next phase.
/// Invalid transitions are errors and the caller keeps its current phase.
pub fn transition(current: FormPhase, event: FormEvent) -> Result<FormPhase, TransferError> {
    use FormEvent::*;
    use FormPhase::*;

    let next = match (current, event) {
        (_, Reset) => Form,

        // From Form
        (Form, Submit) => AwaitingOtp,

        // From AwaitingOtp
        (AwaitingOtp, OtpRejected) => AwaitingOtp,
        (AwaitingOtp, Resend) => AwaitingOtp,
        (AwaitingOtp, OtpLocked) => Form,
        (AwaitingOtp, DetailsRejected) => Form,
        (AwaitingOtp, Back) => Form,
        (AwaitingOtp, Settled) => Result(ResultStatus::Success),
        (AwaitingOtp, SettlementFailed) => Result(ResultStatus::Failure),

        // From Result
        (Result(_), NewTransaction) => Form,

        _ => {
            return Err(TransferError::InvalidStateTransition {
                from: current.as_str().to_string(),
                event: event.as_str().to_string(),
            })
        }
    };

    Ok(next)
}
