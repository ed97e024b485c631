use contracts::dashboards::d402_shared_dashboard::{
    SharePeriod, Variable, VariablePeriod, VariableValueType, WidgetResult,
};

use super::context::MetricContext;
use super::error::ShareError;

/// Sum of every period entry that overlaps `query`.
///
/// An entry that only partially overlaps still contributes its whole value.
pub fn sum_overlapping(periods: &[VariablePeriod], query: &SharePeriod) -> f64 {
    periods
        .iter()
        .filter(|p| query.overlaps(p.start_date, p.end_date))
        .map(|p| p.value)
        .sum()
}

/// Numeric value of a variable for the context period, `None` if it does not exist.
pub async fn variable_value(
    ctx: &MetricContext<'_>,
    variable_id: &str,
) -> Result<Option<(Variable, f64)>, ShareError> {
    let Some(variable) = ctx.store.find_variable(ctx.empresa_id, variable_id).await? else {
        return Ok(None);
    };

    let value = match variable.value_type {
        VariableValueType::Static => variable.value,
        VariableValueType::Periodic => {
            let periods = ctx.store.list_variable_periods(&variable.id).await?;
            sum_overlapping(&periods, &ctx.period)
        }
    };
    Ok(Some((variable, value)))
}

pub async fn resolve_variable(
    ctx: &MetricContext<'_>,
    variable_id: &str,
) -> Result<WidgetResult, ShareError> {
    match variable_value(ctx, variable_id).await? {
        Some((variable, value)) => Ok(WidgetResult::new(
            value,
            ctx.locale.format(value, variable.format),
            variable.name,
        )),
        None => {
            tracing::warn!("Variable {} not found for tenant {}", variable_id, ctx.empresa_id);
            Ok(WidgetResult::new(0.0, "0", "Variável não encontrada"))
        }
    }
}
