//! Display formatting for amounts and account numbers.

/// Group digits in threes with `.` the way `id-ID` locales print integers.
///
/// `1000000` -> `"1.000.000"`
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `format_amount` with the rupiah prefix, e.g. `"Rp 50.000"`
pub fn format_rupiah(amount: u64) -> String {
    format!("Rp {}", format_amount(amount))
}

/// Split a 10-digit account number as `123-456-7890`.
/// Anything else is returned unchanged.
pub fn format_account(account: &str) -> String {
    if account.len() != 10 || !account.bytes().all(|b| b.is_ascii_digit()) {
        return account.to_string();
    }
    format!("{}-{}-{}", &account[..3], &account[3..6], &account[6..])
}

/// Hide all but the last four digits
pub fn mask_account(account: &str) -> String {
    let count = account.chars().count();
    if count <= 4 {
        return account.to_string();
    }
    let visible: String = account.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1.000");
        assert_eq!(format_amount(10_000), "10.000");
        assert_eq!(format_amount(500_000), "500.000");
        assert_eq!(format_amount(50_000_000), "50.000.000");
        assert_eq!(format_amount(100_000_000), "100.000.000");
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(1_500_000), "Rp 1.500.000");
    }

    #[test]
    fn test_format_account() {
        assert_eq!(format_account("1234567890"), "123-456-7890");
        assert_eq!(format_account("12345"), "12345");
        assert_eq!(format_account("12345abcde"), "12345abcde");
    }

    #[test]
    fn test_mask_account() {
        assert_eq!(mask_account("1234567890"), "******7890");
        assert_eq!(mask_account("123"), "123");
    }
}
