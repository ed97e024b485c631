use contracts::dashboards::d402_shared_dashboard::{
    DashboardSummary, SharedDashboardResponse, WidgetDto,
};
use futures::future::join_all;
use sha2::{Digest, Sha256};

use super::context::MetricContext;
use super::error::ShareError;
use super::lead_stats::compute_lead_statistics;
use super::router::{compute_widget, RoutedWidget};
use super::store::ShareStore;
use crate::shared::format::LocaleFormat;

/// Short, non-reversible tag for a share token, safe to put in logs.
pub fn token_fingerprint(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .take(6)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Resolve a share token into the dashboard with every widget computed.
///
/// Token, dashboard and period problems abort the request. Widget problems
/// only affect the widget itself.
pub async fn get_shared_dashboard(
    store: &dyn ShareStore,
    locale: &LocaleFormat,
    token: Option<&str>,
) -> Result<SharedDashboardResponse, ShareError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(ShareError::MissingToken)?;
    let fingerprint = token_fingerprint(token);

    let mut dashboards = store.find_dashboards_by_share_token(token).await?;
    if dashboards.len() != 1 {
        if dashboards.len() > 1 {
            tracing::warn!(
                "Share token {} matches {} dashboards, refusing",
                fingerprint,
                dashboards.len()
            );
        }
        return Err(ShareError::NotFound);
    }
    let dashboard = dashboards.remove(0);

    let period = dashboard.share_period().ok_or_else(ShareError::missing_period)?;
    if !period.is_ordered() {
        return Err(ShareError::reversed_period());
    }

    let widgets: Vec<RoutedWidget> = store
        .list_widgets(&dashboard.id)
        .await?
        .into_iter()
        .map(RoutedWidget::new)
        .collect();

    tracing::info!(
        "D402 Shared dashboard {} (token {}): {} widgets for {}..{}",
        dashboard.id,
        fingerprint,
        widgets.len(),
        period.start,
        period.end
    );

    let stats = compute_lead_statistics(store, &dashboard.empresa_id, &period).await?;
    let ctx = MetricContext {
        store,
        empresa_id: &dashboard.empresa_id,
        period,
        stats: &stats,
        locale,
    };

    let results = join_all(widgets.iter().map(|w| compute_widget(&ctx, w))).await;
    let widget_data = widgets
        .iter()
        .zip(results)
        .map(|(w, result)| (w.widget.id.clone(), result))
        .collect();

    Ok(SharedDashboardResponse {
        dashboard: DashboardSummary {
            id: dashboard.id.clone(),
            name: dashboard.name.clone(),
            description: dashboard.description.clone(),
        },
        widgets: widgets.iter().map(|w| WidgetDto::from(&w.widget)).collect(),
        period,
        widget_data,
    })
}
