use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ScoringError;

const BASE_ELIGIBLE_ABOVE: u64 = 3;
const NETWORK_ELIGIBLE_ABOVE: u64 = 2;

/// Non-negative integer driving the eligibility formulas, usually a Farcaster FID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u64);

impl Seed {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Seed {
    type Error = ScoringError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| ScoringError::invalid(format!("seed must be non-negative, got {value}")))
    }
}

impl FromStr for Seed {
    type Err = ScoringError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<u64>() {
            return Ok(Self(value));
        }

        match trimmed.parse::<i64>() {
            Ok(value) => Self::try_from(value),
            Err(_) => Err(ScoringError::invalid(format!(
                "seed must be a non-negative integer, got '{trimmed}'"
            ))),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estimated airdrop eligibility across the Base and Farcaster programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub id: String,
    pub base_eligible: bool,
    pub base_amount: u64,
    pub network_eligible: bool,
    pub network_amount: u64,
    pub total_amount: u64,
}

impl EligibilityResult {
    pub fn any_eligible(&self) -> bool {
        self.base_eligible || self.network_eligible
    }

    /// Text suitable for sharing the estimate in a cast composer.
    pub fn share_message(&self) -> String {
        let mut message = String::from("Just checked my airdrop eligibility!\n\n");

        if self.any_eligible() {
            message.push_str(&format!(
                "Total Estimated: ${}\n\n",
                group_thousands(self.total_amount)
            ));
            if self.base_eligible {
                message.push_str(&format!("Base: ${}\n", group_thousands(self.base_amount)));
            }
            if self.network_eligible {
                message.push_str(&format!(
                    "Farcaster: ${}\n",
                    group_thousands(self.network_amount)
                ));
            }
        } else {
            message.push_str("Base: Not Eligible\n");
            message.push_str("Farcaster: Not Eligible\n");
        }

        message.push_str("\nCheck yours at castbase.app!");
        message
    }
}

/// Map a seed onto deterministic eligibility flags and reward amounts.
pub fn estimate(seed: Seed) -> EligibilityResult {
    let value = seed.value();
    let bucket = value % 10;

    let base_eligible = bucket > BASE_ELIGIBLE_ABOVE;
    let network_eligible = bucket > NETWORK_ELIGIBLE_ABOVE;

    let base_amount = if base_eligible {
        program_amount(value, 7, 5_000, 500)
    } else {
        0
    };
    let network_amount = if network_eligible {
        program_amount(value, 13, 10_000, 1_000)
    } else {
        0
    };

    EligibilityResult {
        id: seed.to_string(),
        base_eligible,
        base_amount,
        network_eligible,
        network_amount,
        total_amount: base_amount + network_amount,
    }
}

// Widened so `seed * multiplier` never wraps before the modulo.
fn program_amount(seed: u64, multiplier: u64, modulus: u64, floor: u64) -> u64 {
    let product = u128::from(seed) * u128::from(multiplier);
    (product % u128::from(modulus)) as u64 + floor
}

pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_is_ineligible_everywhere() {
        let result = estimate(Seed::new(0));
        assert!(!result.base_eligible);
        assert!(!result.network_eligible);
        assert_eq!(result.base_amount, 0);
        assert_eq!(result.network_amount, 0);
        assert_eq!(result.total_amount, 0);
        assert_eq!(result.id, "0");
    }

    #[test]
    fn known_seed_matches_published_amounts() {
        let result = estimate(Seed::new(12345));
        assert!(result.base_eligible);
        assert!(result.network_eligible);
        assert_eq!(result.base_amount, 915);
        assert_eq!(result.network_amount, 1485);
        assert_eq!(result.total_amount, 2400);
    }

    #[test]
    fn bucket_three_only_qualifies_for_network_program() {
        let result = estimate(Seed::new(13));
        assert!(!result.base_eligible);
        assert_eq!(result.base_amount, 0);
        assert!(result.network_eligible);
        assert_eq!(result.network_amount, (13 * 13) % 10_000 + 1_000);
    }

    #[test]
    fn amounts_are_positive_exactly_when_eligible() {
        for value in (0..2_000u64).chain([u64::MAX - 5, u64::MAX]) {
            let result = estimate(Seed::new(value));
            assert_eq!(result.base_amount > 0, result.base_eligible, "seed {value}");
            assert_eq!(result.network_amount > 0, result.network_eligible, "seed {value}");
            assert_eq!(
                result.total_amount,
                result.base_amount + result.network_amount
            );
        }
    }

    #[test]
    fn large_seeds_do_not_overflow() {
        let result = estimate(Seed::new(u64::MAX));
        let expected_base = ((u128::from(u64::MAX) * 7) % 5_000) as u64 + 500;
        assert_eq!(result.base_amount, expected_base);
    }

    #[test]
    fn seeds_reject_negative_and_garbage_input() {
        assert_eq!(Seed::try_from(42i64).expect("positive"), Seed::new(42));
        assert!(matches!(
            Seed::try_from(-1i64),
            Err(ScoringError::InvalidArgument(_))
        ));
        assert_eq!(" 977 ".parse::<Seed>().expect("parses"), Seed::new(977));
        assert!("-3".parse::<Seed>().is_err());
        assert!("vitalik".parse::<Seed>().is_err());
    }

    #[test]
    fn share_message_lists_eligible_programs() {
        let message = estimate(Seed::new(12345)).share_message();
        assert!(message.contains("Total Estimated: $2,400"));
        assert!(message.contains("Base: $915"));
        assert!(message.contains("Farcaster: $1,485"));

        let message = estimate(Seed::new(10)).share_message();
        assert!(message.contains("Base: Not Eligible"));
        assert!(message.contains("Farcaster: Not Eligible"));
        assert!(message.ends_with("castbase.app!"));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
