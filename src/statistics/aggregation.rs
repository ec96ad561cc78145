//! Reduces the transactions of one month to sale totals, a price histogram
//! and a category breakdown.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Sale totals for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of the sold transactions.
    pub total_sale: f64,
    /// The number of sold transactions.
    pub sold_count: u64,
    /// The number of transactions that were not sold.
    pub not_sold_count: u64,
}

impl Statistics {
    /// Total up `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut statistics, transaction| {
                if transaction.sold {
                    statistics.total_sale += transaction.price;
                    statistics.sold_count += 1;
                } else {
                    statistics.not_sold_count += 1;
                }

                statistics
            })
    }
}

/// One bucket of the price histogram.
///
/// `min` is only used for the label, a price is placed by comparing it with
/// `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// The lowest whole price shown in the label.
    pub min: u32,
    /// The highest price in the bucket, `None` for the open-ended last bucket.
    pub max: Option<u32>,
}

impl PriceRange {
    /// The label shown for the bucket, e.g. "101-200" or "901-above".
    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}-above", self.min),
        }
    }

    fn contains(&self, price: f64) -> bool {
        self.max.is_none_or(|max| price <= f64::from(max))
    }
}

/// The histogram buckets in ascending order.
pub const PRICE_RANGES: [PriceRange; 10] = [
    PriceRange { min: 0, max: Some(100) },
    PriceRange { min: 101, max: Some(200) },
    PriceRange { min: 201, max: Some(300) },
    PriceRange { min: 301, max: Some(400) },
    PriceRange { min: 401, max: Some(500) },
    PriceRange { min: 501, max: Some(600) },
    PriceRange { min: 601, max: Some(700) },
    PriceRange { min: 701, max: Some(800) },
    PriceRange { min: 801, max: Some(900) },
    PriceRange { min: 901, max: None },
];

/// The number of transactions in one price bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    /// The bucket label, see [PriceRange::label].
    pub range_label: String,
    /// The number of transactions with a price in the bucket.
    pub count: u64,
}

/// Count the transactions in each of the [PRICE_RANGES].
///
/// Every bucket is returned, in order, even when it is empty. A price goes in
/// the first bucket whose upper bound it does not exceed, so a price between
/// two labels such as 100.5 lands in "101-200". Negative and non-finite prices
/// are left out.
pub fn price_histogram(transactions: &[Transaction]) -> Vec<HistogramBucket> {
    let mut counts = [0u64; PRICE_RANGES.len()];

    for transaction in transactions {
        let price = transaction.price;

        if !price.is_finite() || price < 0.0 {
            continue;
        }

        if let Some(index) = PRICE_RANGES.iter().position(|range| range.contains(price)) {
            counts[index] += 1;
        }
    }

    PRICE_RANGES
        .iter()
        .zip(counts)
        .map(|(range, count)| HistogramBucket {
            range_label: range.label(),
            count,
        })
        .collect()
}

/// The number of transactions per category, sorted by category.
pub type CategoryBreakdown = BTreeMap<String, u64>;

/// Count the transactions in each category that appears in `transactions`.
pub fn category_breakdown(transactions: &[Transaction]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::new();

    for transaction in transactions {
        *breakdown.entry(transaction.category.clone()).or_default() += 1;
    }

    breakdown
}

/// All three summaries of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    /// Sale totals.
    pub statistics: Statistics,
    /// The price histogram.
    pub histogram: Vec<HistogramBucket>,
    /// Transaction counts per category.
    pub category_breakdown: CategoryBreakdown,
}

impl MonthlyReport {
    /// Summarise `transactions`, which should all be from the same month.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            statistics: Statistics::from_transactions(transactions),
            histogram: price_histogram(transactions),
            category_breakdown: category_breakdown(transactions),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::Transaction;

    use super::{
        CategoryBreakdown, MonthlyReport, PRICE_RANGES, Statistics, category_breakdown,
        price_histogram,
    };

    fn create_test_transaction(price: f64, sold: bool, category: &str) -> Transaction {
        Transaction::build(1, price, date!(2022 - 03 - 15))
            .sold(sold)
            .category(category)
            .finalize()
    }

    fn histogram_counts(transactions: &[Transaction]) -> Vec<u64> {
        price_histogram(transactions)
            .into_iter()
            .map(|bucket| bucket.count)
            .collect()
    }

    #[test]
    fn labels_are_in_order() {
        let labels: Vec<_> = PRICE_RANGES.iter().map(|range| range.label()).collect();

        assert_eq!(
            labels,
            vec![
                "0-100", "101-200", "201-300", "301-400", "401-500", "501-600", "601-700",
                "701-800", "801-900", "901-above"
            ]
        );
    }

    #[test]
    fn statistics_only_sum_sold_prices() {
        let transactions = vec![
            create_test_transaction(50.0, true, "A"),
            create_test_transaction(25.5, true, "A"),
            create_test_transaction(150.0, false, "B"),
        ];

        let got = Statistics::from_transactions(&transactions);

        assert_eq!(
            got,
            Statistics {
                total_sale: 75.5,
                sold_count: 2,
                not_sold_count: 1
            }
        );
    }

    #[test]
    fn empty_month_has_zeroes_and_every_bucket() {
        let report = MonthlyReport::from_transactions(&[]);

        assert_eq!(report.statistics, Statistics::default());
        assert_eq!(report.histogram.len(), 10);
        assert!(report.histogram.iter().all(|bucket| bucket.count == 0));
        assert!(report.category_breakdown.is_empty());
    }

    #[test]
    fn boundary_prices_go_in_the_lower_bucket() {
        let transactions: Vec<_> = [0.0, 100.0, 101.0, 200.0, 900.0, 901.0]
            .into_iter()
            .map(|price| create_test_transaction(price, true, "A"))
            .collect();

        let got = histogram_counts(&transactions);

        assert_eq!(got, vec![2, 2, 0, 0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn prices_between_labels_go_in_the_next_bucket() {
        let transactions: Vec<_> = [100.5, 200.01, 900.99]
            .into_iter()
            .map(|price| create_test_transaction(price, true, "A"))
            .collect();

        let got = histogram_counts(&transactions);

        assert_eq!(got, vec![0, 1, 1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn large_prices_go_in_the_last_bucket() {
        let transactions = vec![create_test_transaction(1_000_000.0, false, "A")];

        let got = histogram_counts(&transactions);

        assert_eq!(got, vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn invalid_prices_are_not_counted() {
        let transactions: Vec<_> = [-1.0, f64::NAN, f64::INFINITY]
            .into_iter()
            .map(|price| create_test_transaction(price, true, "A"))
            .collect();

        let got = histogram_counts(&transactions);

        assert_eq!(got, vec![0; 10]);
    }

    #[test]
    fn category_breakdown_counts_present_categories() {
        let transactions = vec![
            create_test_transaction(1.0, true, "electronics"),
            create_test_transaction(2.0, false, "jewelery"),
            create_test_transaction(3.0, true, "electronics"),
        ];

        let got = category_breakdown(&transactions);

        assert_eq!(
            got,
            CategoryBreakdown::from([("electronics".to_owned(), 2), ("jewelery".to_owned(), 1)])
        );
    }

    #[test]
    fn report_for_two_transactions() {
        let transactions = vec![
            Transaction::build(1, 50.0, date!(2023 - 03 - 05))
                .sold(true)
                .category("A")
                .finalize(),
            Transaction::build(2, 150.0, date!(2022 - 03 - 20))
                .sold(false)
                .category("B")
                .finalize(),
        ];

        let report = MonthlyReport::from_transactions(&transactions);

        assert_eq!(
            report.statistics,
            Statistics {
                total_sale: 50.0,
                sold_count: 1,
                not_sold_count: 1
            }
        );
        assert_eq!(report.histogram[0].range_label, "0-100");
        assert_eq!(report.histogram[0].count, 1);
        assert_eq!(report.histogram[1].range_label, "101-200");
        assert_eq!(report.histogram[1].count, 1);
        assert!(report.histogram[2..].iter().all(|bucket| bucket.count == 0));
        assert_eq!(
            report.category_breakdown,
            CategoryBreakdown::from([("A".to_owned(), 1), ("B".to_owned(), 1)])
        );
    }

    #[test]
    fn summaries_account_for_every_transaction() {
        let transactions: Vec<_> = (0..57)
            .map(|i| {
                let category = ["A", "B", "C"][i % 3];
                create_test_transaction(i as f64 * 23.7, i % 4 == 0, category)
            })
            .collect();

        let report = MonthlyReport::from_transactions(&transactions);

        let histogram_total: u64 = report.histogram.iter().map(|bucket| bucket.count).sum();
        let category_total: u64 = report.category_breakdown.values().sum();
        let sold_total: f64 = transactions
            .iter()
            .filter(|transaction| transaction.sold)
            .map(|transaction| transaction.price)
            .sum();
        assert_eq!(histogram_total, 57);
        assert_eq!(category_total, 57);
        assert_eq!(
            report.statistics.sold_count + report.statistics.not_sold_count,
            57
        );
        assert_eq!(report.statistics.total_sale, sold_total);
    }
}
