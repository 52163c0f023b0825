//! Net cash position

use crate::models::{CashFlowEntry, CashFlowSummary, FlowType};
use crate::money::Money;

/// Sum inflows and outflows and derive the net position
///
/// Classification is by `flow_type`, not by sign, so both totals stay
/// non-negative for valid entries. There is no monthly-scoped variant.
pub fn summarize_cash_flows(entries: &[CashFlowEntry]) -> CashFlowSummary {
    let (total_inflow, total_outflow) = entries.iter().fold(
        (Money::ZERO, Money::ZERO),
        |(inflow, outflow), entry| match entry.flow_type {
            FlowType::Inflow => (inflow + entry.amount, outflow),
            FlowType::Outflow => (inflow, outflow + entry.amount),
        },
    );

    CashFlowSummary {
        total_inflow,
        total_outflow,
        net_cash_flow: total_inflow - total_outflow,
    }
}
