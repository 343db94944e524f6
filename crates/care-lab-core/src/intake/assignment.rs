use std::collections::HashSet;
use std::str::FromStr;

use crate::models::{Lab, LabTest, OrderedTest, PriceCatalog, UnknownLab};

use super::{IntakeError, IntakeResult};

/// A test picked by the caller together with the lab that will process it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSelection {
    pub key: String,
    pub lab: Lab,
}

impl TestSelection {
    pub fn new(key: impl Into<String>, lab: Lab) -> Self {
        Self {
            key: key.into(),
            lab,
        }
    }
}

/// Parses `KEY` or `KEY:lab`.
impl FromStr for TestSelection {
    type Err = UnknownLab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, lab) = match s.split_once(':') {
            Some((key, lab)) => (key, Lab::parse_or_default(Some(lab))?),
            None => (s, Lab::default()),
        };
        Ok(Self::new(key.trim(), lab))
    }
}

/// Freeze a selection into an ordered test.
///
/// The name comes from the test catalog and the price from the public price
/// of the selected lab. A test without a price entry is ordered at 0.
pub fn order_test(
    tests: &[LabTest],
    prices: &PriceCatalog,
    selection: &TestSelection,
) -> IntakeResult<OrderedTest> {
    let test = tests
        .iter()
        .find(|t| t.key == selection.key)
        .ok_or_else(|| IntakeError::UnknownTest(selection.key.clone()))?;
    let price = prices
        .for_test(&test.key)
        .map(|entry| entry.public_price(selection.lab))
        .unwrap_or(0.0);

    Ok(OrderedTest {
        key: test.key.clone(),
        name: test.name.clone(),
        price,
        processed_at: selection.lab,
    })
}

/// Append selected tests to an order, skipping keys already present.
///
/// All selections are resolved before the order is touched, so an unknown
/// key leaves the order unchanged. Returns the number of tests added.
pub fn add_tests(
    order: &mut Vec<OrderedTest>,
    tests: &[LabTest],
    prices: &PriceCatalog,
    selections: &[TestSelection],
) -> IntakeResult<usize> {
    let mut seen: HashSet<&str> = order.iter().map(|t| t.key.as_str()).collect();
    let mut additions = Vec::new();
    for selection in selections {
        if !seen.insert(selection.key.as_str()) {
            continue;
        }
        additions.push(order_test(tests, prices, selection)?);
    }

    let added = additions.len();
    order.extend(additions);
    Ok(added)
}

/// Build a fresh order from selections.
pub fn build_order(
    tests: &[LabTest],
    prices: &PriceCatalog,
    selections: &[TestSelection],
) -> IntakeResult<Vec<OrderedTest>> {
    let mut order = Vec::new();
    add_tests(&mut order, tests, prices, selections)?;
    Ok(order)
}

/// Drop the tests whose keys are marked, keeping the others in order.
/// Returns the number of tests removed.
pub fn remove_tests(order: &mut Vec<OrderedTest>, marked: &[String]) -> usize {
    let before = order.len();
    order.retain(|t| !marked.contains(&t.key));
    before - order.len()
}

/// Route an ordered test to another lab, re-freezing its price.
///
/// Returns false when the key is not on the order.
pub fn reassign_lab(
    order: &mut [OrderedTest],
    prices: &PriceCatalog,
    key: &str,
    lab: Lab,
) -> bool {
    let Some(test) = order.iter_mut().find(|t| t.key == key) else {
        return false;
    };
    test.processed_at = lab;
    test.price = prices
        .for_test(key)
        .map(|entry| entry.public_price(lab))
        .unwrap_or(0.0);
    true
}
