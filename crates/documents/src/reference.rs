//! Public verification reference codes.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_RANDOM_LEN: usize = 10;

/// Build a reference code such as `OFR-2026-7K3QH9XW2M`.
///
/// The prefix names the letter kind and the year is the issue year.
pub fn generate_reference_code(prefix: &str, issued_on: NaiveDate) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..CODE_RANDOM_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect();
    format!("{prefix}-{}-{suffix}", issued_on.year())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn code_has_prefix_year_and_suffix() {
        let code = generate_reference_code("OFR", NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "OFR");
        assert_eq!(parts[1], "2026");
        assert_eq!(parts[2].len(), CODE_RANDOM_LEN);
        assert!(parts[2].bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn codes_do_not_repeat() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let codes: HashSet<String> = (0..500)
            .map(|_| generate_reference_code("CMP", day))
            .collect();
        assert_eq!(codes.len(), 500);
    }
}
