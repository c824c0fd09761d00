// Error types for the transfer flow
use std::fmt;

use crate::formatter::format_amount;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // Validation errors
    InvalidAccountFormat,
    InvalidAmountRange,
    InsufficientBalance { available: u64, required: u64 },
    DailyLimitExceeded { remaining: u64 },

    // OTP errors
    OtpMismatch { attempts_remaining: u8 },
    OtpAttemptsExhausted,
    MalformedOtpInput,

    // Flow errors
    InvalidStateTransition { from: String, event: String },

    // Settings / storage errors
    InvalidSettings(String),
    Storage(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAccountFormat => write!(f, "Nomor rekening harus 10 digit angka"),
            Self::InvalidAmountRange => {
                write!(f, "Nominal transfer harus antara 10.000 - 50.000.000")
            }
            Self::InsufficientBalance { .. } => write!(f, "Saldo tidak mencukupi"),
            Self::DailyLimitExceeded { remaining } => write!(
                f,
                "Melebihi batas harian. Sisa limit harian: {}",
                format_amount(*remaining)
            ),
            Self::OtpMismatch { .. } => write!(f, "Kode OTP salah. Silakan coba lagi."),
            Self::OtpAttemptsExhausted => {
                write!(f, "Transaksi dibatalkan. Batas percobaan OTP habis.")
            }
            Self::MalformedOtpInput => write!(f, "Kode OTP harus 6 digit"),
            Self::InvalidStateTransition { from, event } => {
                write!(f, "Aksi {} tidak valid pada tahap {}", event, from)
            }
            Self::InvalidSettings(msg) => write!(f, "Pengaturan tidak valid: {}", msg),
            Self::Storage(msg) => write!(f, "Gagal mengakses penyimpanan: {}", msg),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<sled::Error> for TransferError {
    fn from(err: sled::Error) -> Self {
        TransferError::Storage(err.to_string())
    }
}

// Stable codes for logs and the CLI
impl TransferError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAccountFormat => "INVALID_ACCOUNT_FORMAT",
            Self::InvalidAmountRange => "INVALID_AMOUNT_RANGE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::DailyLimitExceeded { .. } => "DAILY_LIMIT_EXCEEDED",
            Self::OtpMismatch { .. } => "OTP_MISMATCH",
            Self::OtpAttemptsExhausted => "OTP_ATTEMPTS_EXHAUSTED",
            Self::MalformedOtpInput => "MALFORMED_OTP_INPUT",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::InvalidSettings(_) => "INVALID_SETTINGS",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Recoverable by correcting the input
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TransferError::InsufficientBalance {
            available: 100,
            required: 200,
        };
        assert_eq!(err.error_code(), "INSUFFICIENT_BALANCE");
        assert!(err.is_user_error());

        let err2 = TransferError::Storage("disk full".to_string());
        assert_eq!(err2.error_code(), "STORAGE_ERROR");
        assert!(!err2.is_user_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            TransferError::InsufficientBalance {
                available: 1,
                required: 2
            }
            .to_string(),
            "Saldo tidak mencukupi"
        );
        assert_eq!(
            TransferError::DailyLimitExceeded {
                remaining: 2_500_000
            }
            .to_string(),
            "Melebihi batas harian. Sisa limit harian: 2.500.000"
        );
        assert_eq!(
            TransferError::OtpMismatch {
                attempts_remaining: 2
            }
            .to_string(),
            "Kode OTP salah. Silakan coba lagi."
        );
    }
}
