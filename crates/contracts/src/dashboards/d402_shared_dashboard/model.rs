use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Display formats
// ---------------------------------------------------------------------------

/// How a variable or calculation result is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFormat {
    #[default]
    Number,
    Currency,
    Percentage,
}

impl MetricFormat {
    /// Unknown strings fall back to `Number`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "currency" => MetricFormat::Currency,
            "percentage" | "percent" => MetricFormat::Percentage,
            _ => MetricFormat::Number,
        }
    }
}

// ---------------------------------------------------------------------------
// Share period
// ---------------------------------------------------------------------------

/// Calendar period a dashboard is shared for. Both bounds are inclusive days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SharePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// UTC window covering `start 00:00:00` up to (not including) the day after `end`.
    ///
    /// On the last representable day the window ends at its final instant.
    pub fn window(&self) -> PeriodWindow {
        let from = self.start.and_time(NaiveTime::MIN).and_utc();
        let until = match self.end.checked_add_days(Days::new(1)) {
            Some(next) => next.and_time(NaiveTime::MIN).and_utc(),
            None => self.end.and_time(NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).expect("valid time")).and_utc(),
        };
        PeriodWindow { from, until }
    }

    /// Day-granular overlap test; partial overlap counts.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }
}

/// Half-open timestamp range `[from, until)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl PeriodWindow {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.from && ts < self.until
    }
}

// ---------------------------------------------------------------------------
// Dashboard & widgets
// ---------------------------------------------------------------------------

/// A dashboard that may be exposed publicly through its share token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Tenant (company) the dashboard belongs to
    pub empresa_id: String,
    pub share_period_start: Option<NaiveDate>,
    pub share_period_end: Option<NaiveDate>,
    pub share_active: bool,
    #[serde(skip_serializing)]
    pub share_token: Option<String>,
}

impl Dashboard {
    /// Share period, only when both bounds are configured.
    pub fn share_period(&self) -> Option<SharePeriod> {
        match (self.share_period_start, self.share_period_end) {
            (Some(start), Some(end)) => Some(SharePeriod::new(start, end)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSize {
    pub width: i32,
    pub height: i32,
}

/// One configured card on a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub dashboard_id: String,
    pub widget_type: String,
    pub metric_key: String,
    pub title: String,
    /// Display configuration, opaque to the engine
    pub config: serde_json::Value,
    pub position: WidgetPosition,
    pub size: WidgetSize,
}

// ---------------------------------------------------------------------------
// Variables & calculations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableValueType {
    #[default]
    Static,
    Periodic,
}

impl VariableValueType {
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "periodic" => VariableValueType::Periodic,
            _ => VariableValueType::Static,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    pub empresa_id: String,
    pub name: String,
    pub description: Option<String>,
    pub value_type: VariableValueType,
    /// Used only for `Static` variables
    pub value: f64,
    pub format: MetricFormat,
}

/// Time-bounded value of a periodic variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariablePeriod {
    pub id: String,
    pub variable_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calculation {
    pub id: String,
    pub empresa_id: String,
    pub name: String,
    pub description: Option<String>,
    pub formula: super::formula::FormulaNode,
    pub result_format: MetricFormat,
}

// ---------------------------------------------------------------------------
// Leads (read-only CRM data)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub empresa_id: String,
    pub value: f64,
    pub status: String,
    pub sold_value: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub field_id: String,
    pub value: Option<String>,
}

impl CustomFieldValue {
    /// `None` and `""` count as not filled.
    pub fn is_filled(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// A lead together with its custom field values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadCustomFields {
    pub lead_id: String,
    pub values: Vec<CustomFieldValue>,
}
