//! # Profit Accrual Engine
//!
//! ```text
//! pure  = Σ_i bees[i] * daily_profit[i] * elapsed / 86400     (per term)
//! bonus = pure  * (10000 + bonus_bp) / 10000
//! total = bonus * mood / MAX_MOOD
//! ```
//!
//! Every division truncates toward zero at the step shown. Overflow is an
//! error, never a wrap.

use apiary_shared::{Timestamp, BASIS_POINTS, MAX_MOOD, SECONDS_PER_DAY};

use crate::amount::Amount;
use crate::apiary::Apiary;
use crate::bee::{BeeArray, BeeSlot};
use crate::bonus::calc_bonus_percent_bp;
use crate::catalog::Catalog;
use crate::error::LandResult;
use crate::mood::{elapsed_since, mood_of};

/// Breakdown of an apiary's accrued profit at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accrual {
    /// Seconds since the last claim.
    pub elapsed: u64,
    /// Bee yield before bonus and mood.
    pub pure: Amount,
    /// Bonus applied, in basis points.
    pub bonus_percent_bp: u32,
    /// Mood applied.
    pub mood: u32,
    /// Claimable amount.
    pub total: Amount,
}

/// Bee yield over `elapsed` seconds, ignoring items and mood.
///
/// Equipped items never change the pure yield, so no items are taken here;
/// callers holding a bees/items/elapsed triple pass only the bees.
///
/// # Errors
///
/// Returns `LandError::ArithmeticOverflow` if any term or the sum overflows.
pub fn calc_pure_profit(catalog: &Catalog, bees: &BeeArray<u32>, elapsed: u64) -> LandResult<Amount> {
    BeeSlot::ALL.iter().try_fold(Amount::ZERO, |sum, &slot| {
        let count = bees[slot.index()];
        if count == 0 {
            return Ok(sum);
        }
        let numerator = u128::from(count) * u128::from(elapsed);
        let term = catalog
            .bee(slot)
            .daily_profit
            .mul_div(numerator, u128::from(SECONDS_PER_DAY))?;
        sum.safe_add(term)
    })
}

/// Applies the bonus and mood multipliers to a pure yield.
///
/// # Errors
///
/// Returns `LandError::ArithmeticOverflow` on overflow.
pub fn apply_multipliers(pure: Amount, bonus_percent_bp: u32, mood: u32) -> LandResult<Amount> {
    let basis = u128::from(BASIS_POINTS);
    pure.mul_div(basis + u128::from(bonus_percent_bp), basis)?
        .mul_div(u128::from(mood), u128::from(MAX_MOOD))
}

/// Full accrual of `apiary` at `now`.
///
/// # Errors
///
/// Returns `LandError::ArithmeticOverflow` on overflow.
pub fn calc_total_profit(catalog: &Catalog, apiary: &Apiary, now: Timestamp) -> LandResult<Accrual> {
    let last_claim = apiary.last_claim_timestamp();
    let elapsed = elapsed_since(last_claim, now);
    let pure = calc_pure_profit(catalog, apiary.bees(), elapsed)?;
    let bonus_percent_bp = calc_bonus_percent_bp(catalog, apiary.items());
    let mood = mood_of(last_claim, now, catalog.mood_recovery_time());
    let total = apply_multipliers(pure, bonus_percent_bp, mood)?;

    Ok(Accrual {
        elapsed,
        pure,
        bonus_percent_bp,
        mood,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiary_shared::AccountId;

    use crate::error::LandError;

    const DAY: u64 = SECONDS_PER_DAY;

    #[test]
    fn test_one_bee_one_day() {
        let catalog = Catalog::default();
        let r0 = catalog.bee(BeeSlot::Bee1).daily_profit;
        assert_eq!(calc_pure_profit(&catalog, &[1, 0, 0, 0, 0, 0, 0], DAY).unwrap(), r0);
    }

    #[test]
    fn test_mixed_bees_twelve_days() {
        let catalog = Catalog::default();
        let r = catalog.bee_daily_profits();
        let expected = r[0].to_wei() + r[1].to_wei() + 3 * r[2].to_wei() + 4 * r[3].to_wei();
        assert_eq!(
            calc_pure_profit(&catalog, &[1, 1, 3, 4, 0, 0, 0], 12 * DAY).unwrap(),
            Amount::from_wei(12 * expected)
        );
    }

    #[test]
    fn test_truncates_per_term() {
        let mut catalog = Catalog::default();
        let mut profits = [Amount::ZERO; 7];
        profits[0] = Amount::from_wei(1);
        profits[1] = Amount::from_wei(1);
        catalog.set_bee_daily_profits(profits);
        // each term is 1 * 43200 / 86400 = 0.5 wei, truncated to 0
        assert_eq!(
            calc_pure_profit(&catalog, &[1, 1, 0, 0, 0, 0, 0], DAY / 2).unwrap(),
            Amount::ZERO
        );
    }

    #[test]
    fn test_zero_elapsed() {
        let catalog = Catalog::default();
        assert_eq!(calc_pure_profit(&catalog, &[9; 7], 0).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_overflow_is_error() {
        let mut catalog = Catalog::default();
        catalog.set_bee_daily_profits([Amount::MAX; 7]);
        assert_eq!(
            calc_pure_profit(&catalog, &[1, 0, 0, 0, 0, 0, 0], DAY),
            Err(LandError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_multipliers() {
        let pure = Amount::from_whole(100);
        assert_eq!(apply_multipliers(pure, 0, MAX_MOOD).unwrap(), pure);
        assert_eq!(apply_multipliers(pure, 5_000, MAX_MOOD).unwrap(), Amount::from_whole(150));
        assert_eq!(apply_multipliers(pure, 5_000, 5_000).unwrap(), Amount::from_whole(75));
        assert_eq!(apply_multipliers(pure, 5_000, 0).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_total_profit_breakdown() {
        let mut catalog = Catalog::default();
        catalog.save_set(1, 1_000, [1, 0, 0, 0, 0, 0, 0], [1_000; 7]).unwrap();

        let mut apiary = Apiary::new(AccountId::repeat_byte(1), 10, 0);
        apiary.bees = [2, 0, 0, 0, 0, 0, 0];
        apiary.items = [1, 0, 0, 0, 0, 0, 0];

        let accrual = calc_total_profit(&catalog, &apiary, DAY).unwrap();
        assert_eq!(accrual.elapsed, DAY);
        assert_eq!(accrual.pure, Amount::from_whole(2));
        assert_eq!(accrual.bonus_percent_bp, 2_000);
        assert_eq!(accrual.mood, 8_572);
        // 2 * 1.2 * 0.8572
        assert_eq!(accrual.total, "2.05728".parse().unwrap());
    }
}
