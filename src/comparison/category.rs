//! Category average CAGR

use super::FundMetrics;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean CAGR of all funds sharing a category label
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverage {
    /// `None` groups funds without a declared category
    pub category: Option<String>,
    pub average_cagr_percent: f64,
    pub fund_count: usize,
}

/// Group `(category, cagr)` pairs and average each group.
/// Missing categories form their own group (listed first).
pub fn average_by_category<'a, I>(entries: I) -> Vec<CategoryAverage>
where
    I: IntoIterator<Item = (Option<&'a str>, f64)>,
{
    let mut groups: BTreeMap<Option<&str>, (f64, usize)> = BTreeMap::new();
    for (category, cagr) in entries {
        let group = groups.entry(category).or_insert((0.0, 0));
        group.0 += cagr;
        group.1 += 1;
    }

    groups
        .into_iter()
        .map(|(category, (sum, count))| CategoryAverage {
            category: category.map(str::to_string),
            average_cagr_percent: sum / count as f64,
            fund_count: count,
        })
        .collect()
}

/// Category averages over evaluated funds
pub fn category_averages(funds: &[FundMetrics]) -> Vec<CategoryAverage> {
    average_by_category(
        funds
            .iter()
            .map(|f| (f.category.as_deref(), f.cagr_percent)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category_mean() {
        let averages = average_by_category([
            (Some("Equity"), 10.0),
            (Some("Equity"), 20.0),
            (Some("Equity"), 30.0),
        ]);

        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].category.as_deref(), Some("Equity"));
        assert_eq!(averages[0].average_cagr_percent, 20.0);
        assert_eq!(averages[0].fund_count, 3);
    }

    #[test]
    fn test_missing_category_is_own_group() {
        let averages = average_by_category([
            (Some("Debt"), 7.0),
            (None, 12.0),
            (Some("Equity"), 15.0),
            (None, 8.0),
        ]);

        assert_eq!(averages.len(), 3);
        assert_eq!(averages[0].category, None);
        assert_eq!(averages[0].average_cagr_percent, 10.0);
        assert_eq!(averages[0].fund_count, 2);
        assert_eq!(averages[1].category.as_deref(), Some("Debt"));
        assert_eq!(averages[2].category.as_deref(), Some("Equity"));
    }

    #[test]
    fn test_empty_input() {
        assert!(average_by_category(Vec::<(Option<&str>, f64)>::new()).is_empty());
    }
}
