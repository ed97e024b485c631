use contracts::dashboards::d402_shared_dashboard::{MetricFormat, WidgetResult};

use super::lead_stats::LeadStatistics;
use crate::shared::format::LocaleFormat;

/// Built-in metrics computed from `LeadStatistics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardMetric {
    LeadsTotal,
    LeadsActive,
    LeadsTotalValue,
    LeadsAverageValue,
    LeadsConversionRate,
    SalesTotal,
    SalesTotalValue,
    LossesTotal,
}

impl StandardMetric {
    pub const ALL: [StandardMetric; 8] = [
        StandardMetric::LeadsTotal,
        StandardMetric::LeadsActive,
        StandardMetric::LeadsTotalValue,
        StandardMetric::LeadsAverageValue,
        StandardMetric::LeadsConversionRate,
        StandardMetric::SalesTotal,
        StandardMetric::SalesTotalValue,
        StandardMetric::LossesTotal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StandardMetric::LeadsTotal => "leads_total",
            StandardMetric::LeadsActive => "leads_active",
            StandardMetric::LeadsTotalValue => "leads_total_value",
            StandardMetric::LeadsAverageValue => "leads_average_value",
            StandardMetric::LeadsConversionRate => "leads_conversion_rate",
            StandardMetric::SalesTotal => "sales_total",
            StandardMetric::SalesTotalValue => "sales_total_value",
            StandardMetric::LossesTotal => "losses_total",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            StandardMetric::LeadsTotal => "Total de leads",
            StandardMetric::LeadsActive => "Leads ativos",
            StandardMetric::LeadsTotalValue => "Valor total",
            StandardMetric::LeadsAverageValue => "Ticket médio",
            StandardMetric::LeadsConversionRate => "Taxa de conversão",
            StandardMetric::SalesTotal => "Total de vendas",
            StandardMetric::SalesTotalValue => "Valor vendido",
            StandardMetric::LossesTotal => "Leads perdidos",
        }
    }

    pub fn format(&self) -> MetricFormat {
        match self {
            StandardMetric::LeadsTotalValue
            | StandardMetric::LeadsAverageValue
            | StandardMetric::SalesTotalValue => MetricFormat::Currency,
            StandardMetric::LeadsConversionRate => MetricFormat::Percentage,
            _ => MetricFormat::Number,
        }
    }

    pub fn value(&self, stats: &LeadStatistics) -> f64 {
        match self {
            StandardMetric::LeadsTotal => stats.total as f64,
            StandardMetric::LeadsActive => stats.active as f64,
            StandardMetric::LeadsTotalValue => stats.total_value,
            StandardMetric::LeadsAverageValue => stats.avg_value,
            StandardMetric::LeadsConversionRate => stats.conversion_rate,
            StandardMetric::SalesTotal => stats.sold as f64,
            StandardMetric::SalesTotalValue => stats.sold_value,
            StandardMetric::LossesTotal => stats.lost as f64,
        }
    }
}

/// Numeric value of a metric key; unknown keys are 0.
pub fn metric_value(key: &str, stats: &LeadStatistics) -> f64 {
    StandardMetric::from_key(key).map_or(0.0, |m| m.value(stats))
}

/// Look up and format a built-in metric.
///
/// Widgets may still reference metrics that no longer exist, so an unknown
/// key renders as a dash instead of failing.
pub fn standard_metric(key: &str, stats: &LeadStatistics, locale: &LocaleFormat) -> WidgetResult {
    match StandardMetric::from_key(key) {
        Some(metric) => {
            let value = metric.value(stats);
            WidgetResult::new(value, locale.format(value, metric.format()), metric.subtitle())
        }
        None => WidgetResult::new(0.0, "—", key),
    }
}
