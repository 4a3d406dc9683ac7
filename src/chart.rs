use crate::profile::FinancialProfile;

/// One labelled value in a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: &'static str,
    pub value: f64,
}

/// Figures derived from a profile for the two report charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Potential savings then expenses, per month.
    pub cash_flow: [ChartPoint; 2],
    /// Total assets then total liabilities.
    pub balance_sheet: [ChartPoint; 2],
    /// Rounded percentage of income left after expenses. `None` when there is
    /// no positive income to divide by.
    pub savings_rate: Option<u32>,
    pub net_worth: f64,
}

impl ChartData {
    pub fn from_profile(profile: &FinancialProfile) -> Self {
        let savings = (profile.monthly_income - profile.monthly_expenses).max(0.0);
        let savings_rate = if profile.monthly_income > 0.0 {
            Some((savings / profile.monthly_income * 100.0).round() as u32)
        } else {
            None
        };

        Self {
            cash_flow: [
                ChartPoint {
                    label: "結餘 (Potential Savings)",
                    value: savings,
                },
                ChartPoint {
                    label: "支出 (Expenses)",
                    value: profile.monthly_expenses,
                },
            ],
            balance_sheet: [
                ChartPoint {
                    label: "資產",
                    value: profile.total_assets,
                },
                ChartPoint {
                    label: "負債",
                    value: profile.total_liabilities,
                },
            ],
            savings_rate,
            net_worth: profile.total_assets - profile.total_liabilities,
        }
    }

    /// Savings rate as shown to the reader, e.g. `40%` or `N/A`.
    pub fn savings_rate_label(&self) -> String {
        match self.savings_rate {
            Some(rate) => format!("{rate}%"),
            None => "N/A".to_string(),
        }
    }
}

/// Share of `value` in `total` as a fraction in `0.0..=1.0`.
pub(crate) fn share(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        (value / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(income: f64, expenses: f64) -> FinancialProfile {
        FinancialProfile {
            monthly_income: income,
            monthly_expenses: expenses,
            ..FinancialProfile::default()
        }
    }

    #[test]
    fn default_profile() {
        let data = ChartData::from_profile(&FinancialProfile::default());
        assert_eq!(data.cash_flow[0].value, 20_000.0);
        assert_eq!(data.cash_flow[1].value, 30_000.0);
        assert_eq!(data.savings_rate, Some(40));
        assert_eq!(data.net_worth, 500_000.0);
    }

    #[test]
    fn overspending_clamps_savings_to_zero() {
        let data = ChartData::from_profile(&profile(1000.0, 1500.0));
        assert_eq!(data.cash_flow[0].value, 0.0);
        assert_eq!(data.savings_rate, Some(0));
    }

    #[test]
    fn zero_income_has_no_savings_rate() {
        let data = ChartData::from_profile(&profile(0.0, 100.0));
        assert_eq!(data.savings_rate, None);
        assert_eq!(data.savings_rate_label(), "N/A");
    }

    #[test]
    fn savings_rate_rounds() {
        let data = ChartData::from_profile(&profile(3.0, 1.0));
        assert_eq!(data.savings_rate, Some(67));
        assert_eq!(data.savings_rate_label(), "67%");
    }

    #[test]
    fn negative_net_worth() {
        let data = ChartData::from_profile(&FinancialProfile {
            total_assets: 100.0,
            total_liabilities: 250.0,
            ..FinancialProfile::default()
        });
        assert_eq!(data.net_worth, -150.0);
        assert_eq!(data.balance_sheet[1].value, 250.0);
    }

    #[test]
    fn share_handles_empty_totals() {
        assert_eq!(share(5.0, 0.0), 0.0);
        assert_eq!(share(5.0, 10.0), 0.5);
        assert_eq!(share(-1.0, 10.0), 0.0);
    }
}
