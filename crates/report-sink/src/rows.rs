use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use yield_engine::YieldReport;

/// Visible columns of the published ranking, in sheet order.
pub const HEADERS: [&str; 11] = [
    "Ticker",
    "Name",
    "Nominal",
    "Price",
    "ACI",
    "Fee",
    "Coupon sum",
    "Redemption",
    "Net profit",
    "Net yield p.a.",
    "Qualified",
];

/// Zero-based index of the transient numeric ranking column. It sits right
/// after the visible columns, drives the descending sort, and is cleared
/// from the persisted sheet afterwards.
pub const SORT_COLUMN: usize = HEADERS.len();

pub fn qualified_label(qualified_only: bool) -> &'static str {
    if qualified_only { "yes" } else { "" }
}

/// One spreadsheet row for a report: the visible cells as strings (the
/// sheet parses them as user-entered values) plus the numeric sort key.
pub fn sheet_row(report: &YieldReport) -> Vec<Value> {
    let mut row: Vec<Value> = vec![
        report.ticker.clone().into(),
        report.name.clone().into(),
        report.nominal.round_dp(2).to_string().into(),
        report.price.round_dp(2).to_string().into(),
        report.accrued_interest.round_dp(2).to_string().into(),
        report.fee.round_dp(2).to_string().into(),
        report.coupon_sum.round_dp(2).to_string().into(),
        report.horizon_display().into(),
        report.profit_absolute_net.round_dp(2).to_string().into(),
        report.annual_net_display().into(),
        qualified_label(report.qualified_only).into(),
    ];
    row.push(
        report
            .profit_annual_net_pct
            .to_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
    );
    row
}

/// Reports ordered descending by post-tax annualized yield, the order the
/// console sink renders directly (the spreadsheet sorts on the sheet side).
pub fn sorted_desc(reports: &[YieldReport]) -> Vec<YieldReport> {
    let mut sorted = reports.to_vec();
    sorted.sort_by(|a, b| b.profit_annual_net_pct.cmp(&a.profit_annual_net_pct));
    sorted
}
