use async_trait::async_trait;
use contracts::dashboards::d402_shared_dashboard::{
    Calculation, Dashboard, Lead, LeadCustomFields, PeriodWindow, Variable, VariablePeriod, Widget,
};

use super::error::StoreError;

/// Read access to everything the engine aggregates over.
///
/// Every lead, variable and calculation lookup is scoped by tenant.
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// Active dashboards carrying this share token.
    async fn find_dashboards_by_share_token(&self, token: &str)
        -> Result<Vec<Dashboard>, StoreError>;

    /// Widgets of a dashboard ordered by `(position.y, position.x)`.
    async fn list_widgets(&self, dashboard_id: &str) -> Result<Vec<Widget>, StoreError>;

    async fn list_leads(
        &self,
        empresa_id: &str,
        window: &PeriodWindow,
    ) -> Result<Vec<Lead>, StoreError>;

    async fn list_lead_custom_fields(
        &self,
        empresa_id: &str,
        window: &PeriodWindow,
    ) -> Result<Vec<LeadCustomFields>, StoreError>;

    async fn find_variable(
        &self,
        empresa_id: &str,
        variable_id: &str,
    ) -> Result<Option<Variable>, StoreError>;

    async fn list_variable_periods(
        &self,
        variable_id: &str,
    ) -> Result<Vec<VariablePeriod>, StoreError>;

    async fn find_calculation(
        &self,
        empresa_id: &str,
        calculation_id: &str,
    ) -> Result<Option<Calculation>, StoreError>;
}
