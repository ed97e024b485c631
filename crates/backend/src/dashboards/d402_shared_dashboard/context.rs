use contracts::dashboards::d402_shared_dashboard::SharePeriod;

use super::lead_stats::LeadStatistics;
use super::store::ShareStore;
use crate::shared::format::LocaleFormat;

/// Everything a single widget computation may read.
///
/// Built once per request; all fields are shared read-only between widgets.
pub struct MetricContext<'a> {
    pub store: &'a dyn ShareStore,
    pub empresa_id: &'a str,
    pub period: SharePeriod,
    pub stats: &'a LeadStatistics,
    pub locale: &'a LocaleFormat,
}
