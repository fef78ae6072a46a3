use uuid::Uuid;

use crate::error::AppResult;
use crate::models::WheelReportRow;
use crate::store::TelemetryRepository;

#[derive(Clone)]
pub struct ReportAggregator<S> {
    store: S,
}

impl<S: TelemetryRepository> ReportAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Out-of-bounds sample counts for every wheel of the company.
    ///
    /// Values equal to a threshold count as inside. Wheels without samples
    /// appear with zero counts.
    pub async fn generate_report(&self, company_id: Uuid) -> AppResult<Vec<WheelReportRow>> {
        let rows = self.store.report_rows(company_id).await?;
        tracing::info!(company_id = %company_id, wheels = rows.len(), "Wheel report generated");
        Ok(rows)
    }
}
