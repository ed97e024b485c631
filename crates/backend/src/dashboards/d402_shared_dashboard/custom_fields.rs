use contracts::dashboards::d402_shared_dashboard::{LeadCustomFields, WidgetResult};

use super::context::MetricContext;
use super::error::ShareError;

/// Number of leads with a non-empty value for `field_id`.
pub fn count_filled(leads: &[LeadCustomFields], field_id: &str) -> u64 {
    leads
        .iter()
        .filter(|lead| {
            lead.values
                .iter()
                .any(|v| v.field_id == field_id && v.is_filled())
        })
        .count() as u64
}

/// Fill count of a custom field over the context's tenant and period.
pub async fn custom_field_count(ctx: &MetricContext<'_>, field_id: &str) -> Result<u64, ShareError> {
    let leads = ctx
        .store
        .list_lead_custom_fields(ctx.empresa_id, &ctx.period.window())
        .await?;
    Ok(count_filled(&leads, field_id))
}

pub async fn resolve_custom_field(
    ctx: &MetricContext<'_>,
    field_id: &str,
) -> Result<WidgetResult, ShareError> {
    let count = custom_field_count(ctx, field_id).await?;
    let value = count as f64;
    Ok(WidgetResult::new(
        value,
        ctx.locale.integer(value),
        format!("{count} registros"),
    ))
}
