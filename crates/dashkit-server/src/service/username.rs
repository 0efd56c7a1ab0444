//! Default usernames derived from email addresses.

use sha2::{Digest, Sha256};

/// Characters stripped from the local part of an email address.
const STRIPPED_CHARACTERS: &[char] = &[
    '&', '/', '\\', '#', ',', '+', '(', ')', '$', '~', '%', '.', '_', '@', '\'', '"', ':', '*',
    '?', '<', '>', '{', '}',
];

/// Prefix used when nothing usable is left of the local part.
const FALLBACK_PREFIX: &str = "user";

/// Default number of suffix digits.
pub const DEFAULT_SUFFIX_DIGITS: u8 = 3;

/// Largest suffix that still fits the `u64` arithmetic below.
pub const MAX_SUFFIX_DIGITS: u8 = 9;

/// Derives a username from an email address.
///
/// The username is the local part of the address with punctuation removed,
/// followed by a numeric suffix of exactly `budget` digits. The suffix is a
/// function of the whole address, so the same address always yields the same
/// username. Usernames are not checked for uniqueness.
///
/// ```
/// use dashkit_server::service::UsernameGenerator;
///
/// let usernames = UsernameGenerator::new(3);
/// let username = usernames.generate("b@y.com");
/// assert!(username.starts_with('b'));
/// assert_eq!(username.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernameGenerator {
    budget: u8,
}

impl UsernameGenerator {
    /// Creates a generator appending `budget` digits, capped at [`MAX_SUFFIX_DIGITS`].
    pub fn new(budget: u8) -> Self {
        Self {
            budget: budget.min(MAX_SUFFIX_DIGITS),
        }
    }

    /// Returns the number of suffix digits.
    #[inline]
    pub fn budget(&self) -> u8 {
        self.budget
    }

    /// Derives the username for `email`.
    pub fn generate(&self, email: &str) -> String {
        let email = email.trim();
        let mut username = Self::prefix(email);

        if let Some(suffix) = self.suffix(email) {
            username.push_str(&suffix.to_string());
        }

        username
    }

    fn prefix(email: &str) -> String {
        let local_part = email.split_once('@').map_or(email, |(local, _)| local);
        let prefix: String = local_part
            .chars()
            .filter(|c| !STRIPPED_CHARACTERS.contains(c))
            .collect();

        if prefix.is_empty() {
            FALLBACK_PREFIX.to_owned()
        } else {
            prefix
        }
    }

    fn suffix(&self, email: &str) -> Option<u64> {
        if self.budget == 0 {
            return None;
        }

        let digest = Sha256::digest(email.to_lowercase().as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let hash = u64::from_be_bytes(head);

        let low = 10u64.pow(u32::from(self.budget) - 1);
        let span = 9 * low;
        Some(low + hash % span)
    }
}

impl Default for UsernameGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX_DIGITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_usernames() {
        let usernames = UsernameGenerator::default();
        assert_eq!(usernames.generate("b@y.com"), "b305");
        assert_eq!(usernames.generate("Ann.Lee+work@Example.com"), "AnnLeework705");
        assert_eq!(usernames.generate("noat"), "noat293");
    }

    #[test]
    fn derivation_is_deterministic() {
        let usernames = UsernameGenerator::default();
        assert_eq!(usernames.generate("a@x.com"), usernames.generate("a@x.com"));
    }

    #[test]
    fn suffix_ignores_case_and_whitespace_but_prefix_keeps_case() {
        let usernames = UsernameGenerator::default();
        assert_eq!(usernames.generate(" B@Y.com "), "B305");
    }

    #[test]
    fn empty_local_part_falls_back() {
        let usernames = UsernameGenerator::default();
        assert_eq!(usernames.generate("...@x.com"), "user790");
        assert!(usernames.generate("@x.com").starts_with("user"));
    }

    #[test]
    fn suffix_has_exactly_budget_digits() {
        for budget in 1..=MAX_SUFFIX_DIGITS {
            let usernames = UsernameGenerator::new(budget);
            for email in ["b@y.com", "a@x.com", "someone.else@example.org"] {
                let username = usernames.generate(email);
                let digits = username.trim_start_matches(|c: char| !c.is_ascii_digit());
                assert_eq!(digits.len(), usize::from(budget), "{username}");
                assert!(!digits.starts_with('0'), "{username}");
            }
        }

        assert_eq!(UsernameGenerator::new(1).generate("b@y.com"), "b8");
        assert_eq!(UsernameGenerator::new(9).generate("b@y.com"), "b648837305");
    }

    #[test]
    fn zero_budget_has_no_suffix() {
        assert_eq!(UsernameGenerator::new(0).generate("b@y.com"), "b");
    }

    #[test]
    fn budget_is_capped() {
        assert_eq!(UsernameGenerator::new(42).budget(), MAX_SUFFIX_DIGITS);
    }
}
