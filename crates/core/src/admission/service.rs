//! Spend gate service for activation and serving checks.

use rust_decimal::Decimal;

use super::error::AdmissionError;
use super::types::{EntityStatus, SpendProfile};

/// Spend gate business logic.
///
/// Pure functions over a balance snapshot; the repository runs them inside
/// the same database transaction that persists the entity, reading the
/// balance under the account row lock so a concurrent spend cannot slip in
/// between the check and the save.
pub struct AdmissionService;

impl AdmissionService {
    /// Validate the daily budget against the configured floor.
    ///
    /// Applies regardless of status; an entity may not carry a sub-floor
    /// budget even while inactive.
    ///
    /// # Errors
    ///
    /// Returns `BudgetTooLow` when a budget is present and below `minimum`.
    pub fn validate_budget_floor(
        daily_budget: Option<Decimal>,
        minimum: Decimal,
    ) -> Result<(), AdmissionError> {
        if let Some(budget) = daily_budget {
            if budget < minimum {
                return Err(AdmissionError::BudgetTooLow { budget, minimum });
            }
        }
        Ok(())
    }

    /// Validate a save into the given profile.
    ///
    /// Runs the budget floor check, and when the profile is active also
    /// requires the funding account to hold at least one day's budget. A
    /// failure must abort the save, leaving the stored status untouched.
    ///
    /// # Errors
    ///
    /// Returns `BudgetTooLow` or `InsufficientCredits`.
    pub fn validate_activation(
        profile: &SpendProfile,
        available: Decimal,
        minimum_daily_budget: Decimal,
    ) -> Result<(), AdmissionError> {
        Self::validate_budget_floor(profile.daily_budget, minimum_daily_budget)?;

        if profile.status.is_active() {
            let required = profile.minimum_required_credits();
            if available < required {
                return Err(AdmissionError::InsufficientCredits {
                    required,
                    available,
                });
            }
        }

        Ok(())
    }

    /// Returns true if a save into this profile would be admitted.
    #[must_use]
    pub fn can_activate(
        profile: &SpendProfile,
        available: Decimal,
        minimum_daily_budget: Decimal,
    ) -> bool {
        Self::validate_activation(profile, available, minimum_daily_budget).is_ok()
    }

    /// Returns true if the entity can serve ads right now.
    ///
    /// Pure query: active status and at least the floor available.
    #[must_use]
    pub fn can_serve_ads(
        status: EntityStatus,
        available: Decimal,
        minimum_daily_budget: Decimal,
    ) -> bool {
        status.is_active() && available >= minimum_daily_budget
    }

    /// Returns true if an external scheduler should pause the entity for
    /// low credits. This gate never performs the transition itself.
    #[must_use]
    pub fn should_pause_for_credits(
        status: EntityStatus,
        available: Decimal,
        minimum_daily_budget: Decimal,
    ) -> bool {
        status.is_active() && available < minimum_daily_budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    const FLOOR: Decimal = Decimal::from_parts(2500, 0, 0, false, 2); // 25.00

    fn active(daily_budget: Option<Decimal>) -> SpendProfile {
        SpendProfile {
            status: EntityStatus::Active,
            daily_budget,
        }
    }

    #[test]
    fn test_activation_with_sufficient_credits() {
        // Balance 100.00, budget 30.00: admitted.
        let profile = active(Some(dec!(30.00)));
        assert!(AdmissionService::validate_activation(&profile, dec!(100.00), FLOOR).is_ok());
    }

    #[test]
    fn test_activation_rejected_when_credits_short() {
        // Balance 10.00, budget 25.00: rejected with both figures.
        let profile = active(Some(dec!(25.00)));
        match AdmissionService::validate_activation(&profile, dec!(10.00), FLOOR) {
            Err(AdmissionError::InsufficientCredits {
                required,
                available,
            }) => {
                assert_eq!(required, dec!(25.00));
                assert_eq!(available, dec!(10.00));
            }
            other => panic!("expected InsufficientCredits, got {other:?}"),
        }
    }

    #[test]
    fn test_activation_at_exact_required_amount() {
        let profile = active(Some(dec!(25.00)));
        assert!(AdmissionService::validate_activation(&profile, dec!(25.00), FLOOR).is_ok());
    }

    #[test]
    fn test_activation_without_budget_requires_nothing() {
        let profile = active(None);
        assert!(AdmissionService::validate_activation(&profile, dec!(0.00), FLOOR).is_ok());
    }

    #[rstest]
    #[case(EntityStatus::Inactive)]
    #[case(EntityStatus::Paused)]
    fn test_inactive_profiles_skip_credit_check(#[case] status: EntityStatus) {
        // Budget floor still applies, but no credits are required.
        let profile = SpendProfile {
            status,
            daily_budget: Some(dec!(30.00)),
        };
        assert!(AdmissionService::validate_activation(&profile, dec!(0.00), FLOOR).is_ok());
    }

    #[test]
    fn test_budget_floor_applies_regardless_of_status() {
        let profile = SpendProfile {
            status: EntityStatus::Inactive,
            daily_budget: Some(dec!(10.00)),
        };
        match AdmissionService::validate_activation(&profile, dec!(1000.00), FLOOR) {
            Err(AdmissionError::BudgetTooLow { budget, minimum }) => {
                assert_eq!(budget, dec!(10.00));
                assert_eq!(minimum, dec!(25.00));
            }
            other => panic!("expected BudgetTooLow, got {other:?}"),
        }
    }

    #[test]
    fn test_budget_floor_allows_unset_budget() {
        assert!(AdmissionService::validate_budget_floor(None, FLOOR).is_ok());
        assert!(AdmissionService::validate_budget_floor(Some(dec!(25.00)), FLOOR).is_ok());
    }

    #[test]
    fn test_can_activate_mirrors_validation() {
        let profile = active(Some(dec!(30.00)));
        assert!(AdmissionService::can_activate(&profile, dec!(100.00), FLOOR));
        assert!(!AdmissionService::can_activate(&profile, dec!(10.00), FLOOR));
    }

    #[rstest]
    #[case(EntityStatus::Active, dec!(25.00), true)]
    #[case(EntityStatus::Active, dec!(24.99), false)]
    #[case(EntityStatus::Inactive, dec!(100.00), false)]
    #[case(EntityStatus::Paused, dec!(100.00), false)]
    fn test_can_serve_ads(
        #[case] status: EntityStatus,
        #[case] available: Decimal,
        #[case] expected: bool,
    ) {
        assert_eq!(
            AdmissionService::can_serve_ads(status, available, FLOOR),
            expected
        );
    }

    #[rstest]
    #[case(EntityStatus::Active, dec!(10.00), true)]
    #[case(EntityStatus::Active, dec!(25.00), false)]
    #[case(EntityStatus::Inactive, dec!(0.00), false)]
    #[case(EntityStatus::Paused, dec!(0.00), false)]
    fn test_should_pause_for_credits(
        #[case] status: EntityStatus,
        #[case] available: Decimal,
        #[case] expected: bool,
    ) {
        assert_eq!(
            AdmissionService::should_pause_for_credits(status, available, FLOOR),
            expected
        );
    }

    #[test]
    fn test_serving_checks_are_disjoint() {
        // An active entity either serves or should be paused, never both.
        for cents in [0i64, 1000, 2499, 2500, 10_000] {
            let available = Decimal::new(cents, 2);
            let serves = AdmissionService::can_serve_ads(EntityStatus::Active, available, FLOOR);
            let pauses =
                AdmissionService::should_pause_for_credits(EntityStatus::Active, available, FLOOR);
            assert_ne!(serves, pauses);
        }
    }
}
