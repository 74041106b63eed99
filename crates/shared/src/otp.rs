//! One-time passcode generation for account verification.

use rand::Rng;

/// Number of digits in a verification code.
pub const OTP_LENGTH: usize = 6;

/// Generates a random numeric one-time passcode.
///
/// The code is a zero-padded string of [`OTP_LENGTH`] decimal digits,
/// matching what gets emailed to the user during registration.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect()
}

/// Compares an entered code against the stored one.
///
/// Stored code is `None` once the account is verified; any entry fails then.
pub fn otp_matches(stored: Option<&str>, entered: &str) -> bool {
    match stored {
        Some(code) => !entered.is_empty() && code == entered,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_otp_length_and_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), OTP_LENGTH);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_otp_varies() {
        // 1000 draws from a 10^6 space colliding on every draw is not plausible
        let first = generate_otp();
        let any_different = (0..1000).any(|_| generate_otp() != first);
        assert!(any_different);
    }

    #[test]
    fn test_otp_matches_correct() {
        assert!(otp_matches(Some("123456"), "123456"));
    }

    #[test]
    fn test_otp_matches_wrong_code() {
        assert!(!otp_matches(Some("123456"), "654321"));
    }

    #[test]
    fn test_otp_matches_empty_entry() {
        assert!(!otp_matches(Some("123456"), ""));
    }

    #[test]
    fn test_otp_matches_already_verified() {
        assert!(!otp_matches(None, "123456"));
        assert!(!otp_matches(None, ""));
    }
}
