//! Pure financial calculators for auction listings.
//!
//! Currency amounts are whole won (`i64`). Every monetary output is rounded on
//! its own from unrounded intermediates, half-up toward positive infinity.

use serde::{Deserialize, Serialize};

pub const DEPOSIT_RATIO: f64 = 0.10;
pub const BALANCE_RATIO: f64 = 0.10;
pub const ACQUISITION_TAX_RATE: f64 = 0.013;
pub const MISC_COST: i64 = 3_000_000;
pub const VAT_RATE: f64 = 0.03;
pub const BROKERAGE_RATE: f64 = 0.004;
pub const BROKERAGE_CAP: i64 = 9_000_000;
pub const DEFAULT_LOAN_RATE: f64 = 0.8;
pub const DEFAULT_INTEREST_RATE: f64 = 0.05;
pub const DEFAULT_BUDGET: i64 = 50_000_000;
pub const SQUARE_METERS_PER_PYEONG: f64 = 3.306;

pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

fn won(value: f64) -> i64 {
    round_half_up(value) as i64
}

/// Acquisition and disposal cost assumptions used by every calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostPolicy {
    pub deposit_ratio: f64,
    pub balance_ratio: f64,
    pub acquisition_tax_rate: f64,
    pub misc_cost: i64,
    pub vat_rate: f64,
    pub brokerage_rate: f64,
    pub brokerage_cap: i64,
    pub loan_rate: f64,
    pub interest_rate: f64,
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl CostPolicy {
    pub const fn standard() -> Self {
        Self {
            deposit_ratio: DEPOSIT_RATIO,
            balance_ratio: BALANCE_RATIO,
            acquisition_tax_rate: ACQUISITION_TAX_RATE,
            misc_cost: MISC_COST,
            vat_rate: VAT_RATE,
            brokerage_rate: BROKERAGE_RATE,
            brokerage_cap: BROKERAGE_CAP,
            loan_rate: DEFAULT_LOAN_RATE,
            interest_rate: DEFAULT_INTEREST_RATE,
        }
    }

    /// Cash needed to win at `minimum_price`: deposit and balance, acquisition
    /// tax and the flat miscellaneous cost.
    pub fn required_investment(&self, minimum_price: i64) -> i64 {
        let minimum = minimum_price as f64;
        let deposit_and_balance = minimum * (self.deposit_ratio + self.balance_ratio);
        let acquisition_tax = minimum * self.acquisition_tax_rate;
        won(deposit_and_balance + acquisition_tax + self.misc_cost as f64)
    }

    pub fn can_enter_with_budget(&self, minimum_price: i64, budget: i64) -> bool {
        self.required_investment(minimum_price) <= budget
    }

    pub fn project(&self, request: &ProfitRequest) -> ProfitProjection {
        self.projected_profit(
            request.bid_price,
            request.sale_price,
            request.loan_rate.unwrap_or(self.loan_rate),
            request.interest_rate.unwrap_or(self.interest_rate),
        )
    }

    pub fn projected_profit(
        &self,
        bid_price: i64,
        sale_price: i64,
        loan_rate: f64,
        interest_rate: f64,
    ) -> ProfitProjection {
        let bid = bid_price as f64;
        let sale = sale_price as f64;

        let deposit = bid * self.deposit_ratio;
        let balance = bid * self.balance_ratio;
        let acquisition_tax = bid * self.acquisition_tax_rate;
        let misc_cost = self.misc_cost as f64;
        let total_investment = deposit + balance + acquisition_tax + misc_cost;

        let loan_amount = bid * loan_rate;
        let monthly_interest = loan_amount * interest_rate / 12.0;

        let vat = sale * self.vat_rate;
        let brokerage_fee = (sale * self.brokerage_rate).min(self.brokerage_cap as f64);

        let net_profit = (sale - bid) - (acquisition_tax + misc_cost + vat + brokerage_fee);
        let roi = if total_investment > 0.0 {
            net_profit / total_investment * 100.0
        } else {
            0.0
        };

        ProfitProjection {
            deposit: won(deposit),
            balance: won(balance),
            acquisition_tax: won(acquisition_tax),
            misc_cost: self.misc_cost,
            total_investment: won(total_investment),
            loan_amount: won(loan_amount),
            monthly_interest: won(monthly_interest),
            vat: won(vat),
            brokerage_fee: won(brokerage_fee),
            net_profit: won(net_profit),
            roi: round_tenth(roi),
        }
    }
}

/// Counterfactual purchase/sale scenario for the profit calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitRequest {
    pub bid_price: i64,
    pub sale_price: i64,
    #[serde(default)]
    pub loan_rate: Option<f64>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitProjection {
    pub deposit: i64,
    pub balance: i64,
    pub acquisition_tax: i64,
    pub misc_cost: i64,
    pub total_investment: i64,
    pub loan_amount: i64,
    pub monthly_interest: i64,
    pub vat: i64,
    pub brokerage_fee: i64,
    pub net_profit: i64,
    pub roi: f64,
}

/// Percentage reduction of the minimum bid against the appraisal, one decimal.
pub fn discount_rate(appraisal_price: i64, minimum_price: i64) -> f64 {
    if appraisal_price == 0 {
        return 0.0;
    }
    round_tenth((1.0 - minimum_price as f64 / appraisal_price as f64) * 100.0)
}

pub fn required_investment(minimum_price: i64) -> i64 {
    CostPolicy::standard().required_investment(minimum_price)
}

pub fn projected_profit(bid_price: i64, sale_price: i64) -> ProfitProjection {
    let policy = CostPolicy::standard();
    policy.projected_profit(bid_price, sale_price, policy.loan_rate, policy.interest_rate)
}

pub fn can_enter_with_budget(minimum_price: i64, budget: i64) -> bool {
    CostPolicy::standard().can_enter_with_budget(minimum_price, budget)
}

pub fn m2_to_pyeong(area_m2: f64) -> f64 {
    round_tenth(area_m2 / SQUARE_METERS_PER_PYEONG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_rate_handles_half_price_and_zero_appraisal() {
        assert_eq!(discount_rate(450_000_000, 225_000_000), 50.0);
        assert_eq!(discount_rate(220_000_000, 176_000_000), 20.0);
        assert_eq!(discount_rate(0, 150_000_000), 0.0);
        assert!(discount_rate(100_000_000, 120_000_000) < 0.0);
        assert_eq!(discount_rate(100_000_000, 0), 100.0);
    }

    #[test]
    fn required_investment_matches_fixed_rate_model() {
        assert_eq!(required_investment(240_000_000), 54_120_000);
        assert_eq!(required_investment(0), MISC_COST);
        assert_eq!(required_investment(125_000_000), 29_625_000);
    }

    #[test]
    fn required_investment_is_monotonic() {
        let mut previous = required_investment(0);
        for minimum in (0..=600_000_000_i64).step_by(7_777_777) {
            let current = required_investment(minimum);
            assert!(current >= previous, "{current} < {previous} at {minimum}");
            previous = current;
        }
    }

    #[test]
    fn projected_profit_reproduces_reference_scenario() {
        let projection = projected_profit(200_000_000, 260_000_000);

        assert_eq!(
            projection,
            ProfitProjection {
                deposit: 20_000_000,
                balance: 20_000_000,
                acquisition_tax: 2_600_000,
                misc_cost: 3_000_000,
                total_investment: 45_600_000,
                loan_amount: 160_000_000,
                monthly_interest: 666_667,
                vat: 7_800_000,
                brokerage_fee: 1_040_000,
                net_profit: 45_560_000,
                roi: 99.9,
            }
        );
    }

    #[test]
    fn brokerage_fee_is_capped() {
        let projection = projected_profit(2_000_000_000, 3_000_000_000);
        assert_eq!(projection.brokerage_fee, BROKERAGE_CAP);
    }

    #[test]
    fn project_uses_request_rates_over_policy_defaults() {
        let policy = CostPolicy::standard();
        let projection = policy.project(&ProfitRequest {
            bid_price: 120_000_000,
            sale_price: 150_000_000,
            loan_rate: Some(0.5),
            interest_rate: Some(0.06),
        });

        assert_eq!(projection.loan_amount, 60_000_000);
        assert_eq!(projection.monthly_interest, 300_000);
    }

    #[test]
    fn zero_bid_projection_keeps_misc_cost_investment() {
        let projection = projected_profit(0, 0);
        assert_eq!(projection.total_investment, MISC_COST);
        assert_eq!(projection.net_profit, -MISC_COST);
        assert_eq!(projection.roi, -100.0);
    }

    #[test]
    fn budget_and_pyeong_helpers() {
        assert!(can_enter_with_budget(200_000_000, DEFAULT_BUDGET));
        assert!(!can_enter_with_budget(240_000_000, DEFAULT_BUDGET));
        assert_eq!(m2_to_pyeong(84.9), 25.7);
    }
}
