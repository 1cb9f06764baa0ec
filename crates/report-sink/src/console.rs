use crate::ReportSink;
use crate::error::SinkError;
use crate::rows::{HEADERS, qualified_label, sorted_desc};
use async_trait::async_trait;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use yield_engine::YieldReport;

/// Renders the ranking as a table on stdout instead of publishing it.
/// Used for dry runs.
#[derive(Debug, Default)]
pub struct ConsoleSink {}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportSink for ConsoleSink {
    async fn publish(&self, reports: &[YieldReport]) -> Result<(), SinkError> {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(HEADERS.to_vec());

        for report in sorted_desc(reports) {
            table.add_row(vec![
                report.ticker.clone(),
                report.name.clone(),
                report.nominal.round_dp(2).to_string(),
                report.price.round_dp(2).to_string(),
                report.accrued_interest.round_dp(2).to_string(),
                report.fee.round_dp(2).to_string(),
                report.coupon_sum.round_dp(2).to_string(),
                report.horizon_display(),
                report.profit_absolute_net.round_dp(2).to_string(),
                report.annual_net_display(),
                qualified_label(report.qualified_only).to_string(),
            ]);
        }

        println!("{table}");
        Ok(())
    }
}
