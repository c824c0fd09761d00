//! One-time password lifecycle
//!
//! `Idle -> Issued(code, 3)`; every mismatch burns one attempt, the last one
//! locks the challenge. A match moves to `Verified`.

use rand::Rng;

use crate::transfer::error::TransferError;

pub const OTP_LEN: usize = 6;
pub const OTP_MAX_ATTEMPTS: u8 = 3;

/// Produce a uniformly random code in `100000..=999999`
pub fn generate() -> String {
    rand::thread_rng().gen_range(100_000..=999_999_u32).to_string()
}

/// Compare an entered code with the expected one.
///
/// Input of the wrong length is rejected before any comparison.
pub fn verify(entered: &str, expected: &str) -> Result<bool, TransferError> {
    let entered = entered.trim();
    if entered.chars().count() != OTP_LEN {
        return Err(TransferError::MalformedOtpInput);
    }
    Ok(entered == expected)
}

/// Where codes come from
pub trait OtpSource {
    fn next_code(&mut self) -> String;
}

/// Default source backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOtpSource;

impl OtpSource for RandomOtpSource {
    fn next_code(&mut self) -> String {
        generate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OtpState {
    #[default]
    Idle,
    Issued {
        code: String,
        attempts_remaining: u8,
    },
    Verified,
    Locked,
}

impl OtpState {
    /// Fresh challenge with a full set of attempts
    pub fn issue(code: String) -> Self {
        Self::Issued {
            code,
            attempts_remaining: OTP_MAX_ATTEMPTS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Issued { .. } => "issued",
            Self::Verified => "verified",
            Self::Locked => "locked",
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Issued { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn attempts_remaining(&self) -> u8 {
        match self {
            Self::Issued {
                attempts_remaining, ..
            } => *attempts_remaining,
            Self::Locked => 0,
            Self::Idle | Self::Verified => OTP_MAX_ATTEMPTS,
        }
    }

    /// Check `entered` against the outstanding code.
    ///
    /// Malformed input leaves the attempt counter alone.
    pub fn check(&mut self, entered: &str) -> Result<(), TransferError> {
        let (code, attempts_remaining) = match self {
            Self::Issued {
                code,
                attempts_remaining,
            } => (code, attempts_remaining),
            other => {
                return Err(TransferError::InvalidStateTransition {
                    from: other.as_str().to_string(),
                    event: "verify_otp".to_string(),
                })
            }
        };

        if verify(entered, code)? {
            *self = Self::Verified;
            return Ok(());
        }

        *attempts_remaining = attempts_remaining.saturating_sub(1);
        if *attempts_remaining == 0 {
            *self = Self::Locked;
            return Err(TransferError::OtpAttemptsExhausted);
        }
        Err(TransferError::OtpMismatch {
            attempts_remaining: *attempts_remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_six_digits() {
        for _ in 0..1000 {
            let code = generate();
            assert_eq!(code.len(), OTP_LEN);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_verify_rejects_wrong_length() {
        assert_eq!(verify("12345", "123456"), Err(TransferError::MalformedOtpInput));
        assert_eq!(verify("1234567", "123456"), Err(TransferError::MalformedOtpInput));
        assert_eq!(verify("", "123456"), Err(TransferError::MalformedOtpInput));
        assert_eq!(verify(" 123456 ", "123456"), Ok(true));
        assert_eq!(verify("654321", "123456"), Ok(false));
    }

    #[test]
    fn test_check_counts_down_then_locks() {
        let mut otp = OtpState::issue("123456".to_string());
        assert_eq!(otp.attempts_remaining(), 3);

        assert_eq!(
            otp.check("000000"),
            Err(TransferError::OtpMismatch {
                attempts_remaining: 2
            })
        );
        assert_eq!(
            otp.check("000000"),
            Err(TransferError::OtpMismatch {
                attempts_remaining: 1
            })
        );
        assert_eq!(otp.check("000000"), Err(TransferError::OtpAttemptsExhausted));
        assert_eq!(otp, OtpState::Locked);
        assert_eq!(otp.attempts_remaining(), 0);

        // Locked challenges cannot be retried
        assert!(matches!(
            otp.check("123456"),
            Err(TransferError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_malformed_input_keeps_attempts() {
        let mut otp = OtpState::issue("123456".to_string());
        assert_eq!(otp.check("12"), Err(TransferError::MalformedOtpInput));
        assert_eq!(otp.attempts_remaining(), 3);
    }

    #[test]
    fn test_check_match_verifies() {
        let mut otp = OtpState::issue("123456".to_string());
        otp.check("999999").unwrap_err();
        assert!(otp.check("123456").is_ok());
        assert_eq!(otp, OtpState::Verified);
        assert_eq!(otp.code(), None);
    }
}
