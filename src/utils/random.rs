use rand::{Rng, distr::Alphanumeric};

/// Generates a random alphanumeric string of the specified length.
///
/// Used for login tokens.
pub fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect::<String>()
}

/// Uniformly random number rendered as exactly `digits` decimal digits,
/// zero-padded on the left.
pub fn generate_random_digits(digits: u32) -> String {
    let upper = 10u64.pow(digits);
    let value = rand::rng().random_range(0..upper);
    format!("{:0width$}", value, width = digits as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_length_and_charset() {
        let token = generate_random_string(48);
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_digits_are_zero_padded() {
        for _ in 0..100 {
            let digits = generate_random_digits(13);
            assert_eq!(digits.len(), 13);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
