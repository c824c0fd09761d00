use crate::transfer::error::TransferError;
use crate::transfer::types::{
    SessionState, ACCOUNT_NUMBER_LEN, MAX_TRANSFER_AMOUNT, MIN_TRANSFER_AMOUNT,
};

/// Parse the amount as typed on the form.
///
/// Digits only, optionally grouped with `.` (`50.000`). Anything else gets
/// the range message, same as an out-of-range number.
pub fn parse_amount(input: &str) -> Result<u64, TransferError> {
    parse_grouped(input).ok_or(TransferError::InvalidAmountRange)
}

/// Whole number with optional `.` thousands grouping; `None` for anything else
pub fn parse_grouped(input: &str) -> Option<u64> {
    let input = input.trim();
    let digits: String = input.chars().filter(|c| *c != '.').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if input.contains('.') && !is_grouped(input) {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// `1.000.000` style: first group 1-3 digits, every later group exactly 3
fn is_grouped(input: &str) -> bool {
    let mut groups = input.split('.');
    let first_ok = groups.next().map_or(false, |g| (1..=3).contains(&g.len()));
    first_ok && groups.all(|g| g.len() == 3)
}

/// Form-stage check: only the amount bounds.
///
/// Account format, balance and daily limit are checked after the OTP.
pub fn validate_form(amount: u64) -> bool {
    (MIN_TRANSFER_AMOUNT..=MAX_TRANSFER_AMOUNT).contains(&amount)
}

pub fn is_valid_account(account: &str) -> bool {
    account.len() == ACCOUNT_NUMBER_LEN && account.bytes().all(|b| b.is_ascii_digit())
}

/// Detail checks, first failure wins:
/// 1. account is exactly 10 digits
/// 2. amount fits in the current balance
/// 3. amount fits in the remaining daily limit
pub fn validate_details(
    target_account: &str,
    amount: u64,
    state: &SessionState,
) -> Result<(), TransferError> {
    if !is_valid_account(target_account) {
        return Err(TransferError::InvalidAccountFormat);
    }

    if amount > state.current_balance {
        return Err(TransferError::InsufficientBalance {
            available: state.current_balance,
            required: amount,
        });
    }

    let within_limit = state
        .used_limit
        .checked_add(amount)
        .map_or(false, |total| total <= state.daily_limit);
    if !within_limit {
        return Err(TransferError::DailyLimitExceeded {
            remaining: state.remaining_limit(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::otp::OtpState;

    fn state(balance: u64, limit: u64, used: u64) -> SessionState {
        SessionState {
            current_balance: balance,
            daily_limit: limit,
            used_limit: used,
            otp: OtpState::Idle,
        }
    }

    #[test]
    fn test_validate_form_bounds() {
        assert!(!validate_form(0));
        assert!(!validate_form(9_999));
        assert!(validate_form(10_000));
        assert!(validate_form(1_234_567));
        assert!(validate_form(50_000_000));
        assert!(!validate_form(50_000_001));
        assert!(!validate_form(u64::MAX));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50000"), Ok(50_000));
        assert_eq!(parse_amount(" 50000 "), Ok(50_000));
        assert_eq!(parse_amount("50.000"), Ok(50_000));
        assert_eq!(parse_amount("1.500.000"), Ok(1_500_000));

        for bad in ["", "abc", "-10000", "10,000", "1.50", "10000.", ".100", "12e5"] {
            assert_eq!(parse_amount(bad), Err(TransferError::InvalidAmountRange), "{:?}", bad);
        }

        assert_eq!(
            parse_amount("99999999999999999999999"),
            Err(TransferError::InvalidAmountRange)
        );
    }

    #[test]
    fn test_parse_grouped_rejects_stray_dots() {
        assert_eq!(parse_grouped("100.000.000"), Some(100_000_000));
        assert_eq!(parse_grouped("750000"), Some(750_000));

        for bad in ["1..0.0", "1.0.0", "..", ".", "1000.000", "1.0000"] {
            assert_eq!(parse_grouped(bad), None, "{:?}", bad);
        }
    }

    #[test]
    fn test_account_format() {
        let s = state(100_000_000, 100_000_000, 0);
        assert!(validate_details("0123456789", 10_000, &s).is_ok());

        for bad in [
            "",
            "123456789",
            "12345678901",
            "12345abcde",
            "123456789 ",
            "１２３４５６７８９０",
        ] {
            assert_eq!(
                validate_details(bad, 10_000, &s),
                Err(TransferError::InvalidAccountFormat),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_insufficient_balance() {
        let s = state(1_000_000, 100_000_000, 0);
        assert_eq!(
            validate_details("1234567890", 50_000_000, &s),
            Err(TransferError::InsufficientBalance {
                available: 1_000_000,
                required: 50_000_000
            })
        );
        assert!(validate_details("1234567890", 1_000_000, &s).is_ok());
    }

    #[test]
    fn test_daily_limit() {
        let s = state(100_000_000, 10_000_000, 9_000_000);
        assert_eq!(
            validate_details("1234567890", 2_000_000, &s),
            Err(TransferError::DailyLimitExceeded {
                remaining: 1_000_000
            })
        );
        assert!(validate_details("1234567890", 1_000_000, &s).is_ok());
    }

    #[test]
    fn test_short_circuit_order() {
        // Everything wrong: the account is reported first
        let s = state(0, 10_000, 10_000);
        assert_eq!(validate_details("x", 50_000, &s), Err(TransferError::InvalidAccountFormat));
        // Balance before limit
        assert!(matches!(
            validate_details("1234567890", 50_000, &s),
            Err(TransferError::InsufficientBalance { .. })
        ));
    }
}
