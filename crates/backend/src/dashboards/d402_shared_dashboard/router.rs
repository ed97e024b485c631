use contracts::dashboards::d402_shared_dashboard::{Widget, WidgetResult};

use super::context::MetricContext;
use super::custom_fields::resolve_custom_field;
use super::error::ShareError;
use super::formula::resolve_calculation;
use super::metrics::standard_metric;
use super::variables::resolve_variable;

const VARIABLE_PREFIX: &str = "variable_";
const CALCULATION_PREFIX: &str = "calculation_";
const CUSTOM_FIELD_PREFIX: &str = "custom_field_";

/// What a widget's `metric_key` points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricKey {
    Standard(String),
    Variable(String),
    Calculation(String),
    CustomField(String),
}

impl MetricKey {
    /// A known prefix with nothing after it is malformed; any other key is
    /// looked up in the standard metric table.
    pub fn parse(key: &str) -> Result<Self, ShareError> {
        let key = key.trim();
        let malformed = || ShareError::MalformedMetricKey(key.to_string());
        let id = |rest: &str| {
            if rest.is_empty() {
                Err(malformed())
            } else {
                Ok(rest.to_string())
            }
        };

        if let Some(rest) = key.strip_prefix(VARIABLE_PREFIX) {
            id(rest).map(MetricKey::Variable)
        } else if let Some(rest) = key.strip_prefix(CALCULATION_PREFIX) {
            id(rest).map(MetricKey::Calculation)
        } else if let Some(rest) = key.strip_prefix(CUSTOM_FIELD_PREFIX) {
            id(rest).map(MetricKey::CustomField)
        } else if key.is_empty() {
            Err(malformed())
        } else {
            Ok(MetricKey::Standard(key.to_string()))
        }
    }
}

/// A widget with its metric key decided at load time.
#[derive(Debug, Clone)]
pub struct RoutedWidget {
    pub widget: Widget,
    /// `None` when the key is malformed
    pub metric: Option<MetricKey>,
}

impl RoutedWidget {
    pub fn new(widget: Widget) -> Self {
        let metric = MetricKey::parse(&widget.metric_key).ok();
        Self { widget, metric }
    }
}

/// Dispatch to the resolver matching the metric kind.
pub async fn compute_metric(
    ctx: &MetricContext<'_>,
    metric: &MetricKey,
) -> Result<WidgetResult, ShareError> {
    match metric {
        MetricKey::Standard(key) => Ok(standard_metric(key, ctx.stats, ctx.locale)),
        MetricKey::Variable(id) => resolve_variable(ctx, id).await,
        MetricKey::Calculation(id) => resolve_calculation(ctx, id).await,
        MetricKey::CustomField(id) => resolve_custom_field(ctx, id).await,
    }
}

/// Compute one widget; any failure becomes the error placeholder.
pub async fn compute_widget(ctx: &MetricContext<'_>, routed: &RoutedWidget) -> WidgetResult {
    let outcome = match &routed.metric {
        Some(metric) => compute_metric(ctx, metric).await,
        None => Err(ShareError::MalformedMetricKey(routed.widget.metric_key.clone())),
    };

    match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(
                "Widget {} ({}) failed: {}",
                routed.widget.id,
                routed.widget.metric_key,
                e
            );
            WidgetResult::error()
        }
    }
}
