use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::model::{SharePeriod, Widget};

/// Body of `POST /api/public/dashboard`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedDashboardRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// Public part of the dashboard header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Widget as sent to the viewer (flat position and size).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetDto {
    pub id: String,
    pub widget_type: String,
    pub metric_key: String,
    pub title: String,
    pub config: serde_json::Value,
    pub position_x: i32,
    pub position_y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<&Widget> for WidgetDto {
    fn from(w: &Widget) -> Self {
        Self {
            id: w.id.clone(),
            widget_type: w.widget_type.clone(),
            metric_key: w.metric_key.clone(),
            title: w.title.clone(),
            config: w.config.clone(),
            position_x: w.position.x,
            position_y: w.position.y,
            width: w.size.width,
            height: w.size.height,
        }
    }
}

/// Computed value of one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetResult {
    pub value: f64,
    pub formatted: String,
    pub subtitle: String,
}

impl WidgetResult {
    pub fn new(value: f64, formatted: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            value,
            formatted: formatted.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Placeholder shown when a widget could not be computed.
    pub fn error() -> Self {
        Self::new(0.0, "—", "Erro")
    }
}

/// Successful response of the public dashboard endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedDashboardResponse {
    pub dashboard: DashboardSummary,
    pub widgets: Vec<WidgetDto>,
    pub period: SharePeriod,
    #[serde(rename = "widgetData")]
    pub widget_data: HashMap<String, WidgetResult>,
}

/// Error body shared by every failing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
