use contracts::dashboards::d402_shared_dashboard::{Lead, SharePeriod};

use super::error::ShareError;
use super::store::ShareStore;

const SOLD_STATUSES: &[&str] = &["sold", "vendido"];
const LOST_STATUSES: &[&str] = &["lost", "perdido"];

/// Funnel bucket of a lead, derived from its free-text status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadBucket {
    Active,
    Sold,
    Lost,
}

impl LeadBucket {
    /// Exact match against the alias sets; anything else is active.
    pub fn classify(status: &str) -> Self {
        if SOLD_STATUSES.contains(&status) {
            LeadBucket::Sold
        } else if LOST_STATUSES.contains(&status) {
            LeadBucket::Lost
        } else {
            LeadBucket::Active
        }
    }
}

/// Per-request lead totals for a tenant and period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadStatistics {
    pub total: u64,
    pub active: u64,
    pub sold: u64,
    pub lost: u64,
    /// Sum of `value` over all leads, whatever their status
    pub total_value: f64,
    /// Sum over sold leads of `sold_value`, or `value` when not recorded
    pub sold_value: f64,
    pub avg_value: f64,
    /// `sold / total`, in `[0, 1]`
    pub conversion_rate: f64,
}

impl LeadStatistics {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let mut stats = LeadStatistics::default();

        for lead in leads {
            stats.total += 1;
            stats.total_value += lead.value;
            match LeadBucket::classify(&lead.status) {
                LeadBucket::Sold => {
                    stats.sold += 1;
                    stats.sold_value += lead.sold_value.unwrap_or(lead.value);
                }
                LeadBucket::Lost => stats.lost += 1,
                LeadBucket::Active => stats.active += 1,
            }
        }

        if stats.total > 0 {
            stats.avg_value = stats.total_value / stats.total as f64;
            stats.conversion_rate = stats.sold as f64 / stats.total as f64;
        }
        stats
    }
}

/// Fetch the tenant's leads created within the period and reduce them.
pub async fn compute_lead_statistics(
    store: &dyn ShareStore,
    empresa_id: &str,
    period: &SharePeriod,
) -> Result<LeadStatistics, ShareError> {
    let leads = store
        .list_leads(empresa_id, &period.window())
        .await
        .map_err(ShareError::Aggregation)?;

    let stats = LeadStatistics::from_leads(&leads);
    tracing::debug!(
        "Lead statistics: {} leads ({} active, {} sold, {} lost)",
        stats.total,
        stats.active,
        stats.sold,
        stats.lost
    );
    Ok(stats)
}
