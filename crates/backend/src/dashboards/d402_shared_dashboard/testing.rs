//! In-memory `ShareStore` and fixtures for the engine tests.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use contracts::dashboards::d402_shared_dashboard::{
    Calculation, CustomFieldValue, Dashboard, FormulaNode, Lead, LeadCustomFields, MetricFormat,
    PeriodWindow, Variable, VariablePeriod, VariableValueType, Widget, WidgetPosition, WidgetSize,
};
use std::collections::HashMap;

use super::error::StoreError;
use super::store::ShareStore;

#[derive(Default)]
pub struct MemoryShareStore {
    dashboards: Vec<Dashboard>,
    widgets: Vec<Widget>,
    leads: Vec<Lead>,
    custom_fields: HashMap<String, Vec<CustomFieldValue>>,
    variables: Vec<Variable>,
    periods: Vec<VariablePeriod>,
    calculations: Vec<Calculation>,
    fail_all: bool,
    fail_custom_fields: bool,
}

impl MemoryShareStore {
    pub fn with_dashboard(mut self, dashboard: Dashboard) -> Self {
        self.dashboards.push(dashboard);
        self
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn with_lead(mut self, empresa_id: &str, mut lead: Lead) -> Self {
        lead.empresa_id = empresa_id.to_string();
        self.leads.push(lead);
        self
    }

    pub fn with_custom_field(mut self, lead_id: &str, field_id: &str, value: Option<&str>) -> Self {
        self.custom_fields
            .entry(lead_id.to_string())
            .or_default()
            .push(CustomFieldValue {
                field_id: field_id.to_string(),
                value: value.map(str::to_string),
            });
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_period(mut self, variable_id: &str, start: NaiveDate, end: NaiveDate, value: f64) -> Self {
        let id = format!("p{}", self.periods.len() + 1);
        self.periods.push(VariablePeriod {
            id,
            variable_id: variable_id.to_string(),
            start_date: start,
            end_date: end,
            value,
        });
        self
    }

    pub fn with_calculation(mut self, calculation: Calculation) -> Self {
        self.calculations.push(calculation);
        self
    }

    /// Every call fails.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Only the custom field query fails.
    pub fn failing_custom_fields(mut self) -> Self {
        self.fail_custom_fields = true;
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_all {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn leads_in(&self, empresa_id: &str, window: &PeriodWindow) -> Vec<Lead> {
        self.leads
            .iter()
            .filter(|l| l.empresa_id == empresa_id && window.contains(l.created_at))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn find_dashboards_by_share_token(
        &self,
        token: &str,
    ) -> Result<Vec<Dashboard>, StoreError> {
        self.check()?;
        Ok(self
            .dashboards
            .iter()
            .filter(|d| d.share_active && d.share_token.as_deref() == Some(token))
            .cloned()
            .collect())
    }

    async fn list_widgets(&self, dashboard_id: &str) -> Result<Vec<Widget>, StoreError> {
        self.check()?;
        let mut widgets: Vec<Widget> = self
            .widgets
            .iter()
            .filter(|w| w.dashboard_id == dashboard_id)
            .cloned()
            .collect();
        widgets.sort_by_key(|w| (w.position.y, w.position.x));
        Ok(widgets)
    }

    async fn list_leads(
        &self,
        empresa_id: &str,
        window: &PeriodWindow,
    ) -> Result<Vec<Lead>, StoreError> {
        self.check()?;
        Ok(self.leads_in(empresa_id, window))
    }

    async fn list_lead_custom_fields(
        &self,
        empresa_id: &str,
        window: &PeriodWindow,
    ) -> Result<Vec<LeadCustomFields>, StoreError> {
        self.check()?;
        if self.fail_custom_fields {
            return Err(StoreError::Unavailable("custom fields offline".to_string()));
        }
        Ok(self
            .leads_in(empresa_id, window)
            .into_iter()
            .map(|l| LeadCustomFields {
                values: self.custom_fields.get(&l.id).cloned().unwrap_or_default(),
                lead_id: l.id,
            })
            .collect())
    }

    async fn find_variable(
        &self,
        empresa_id: &str,
        variable_id: &str,
    ) -> Result<Option<Variable>, StoreError> {
        self.check()?;
        Ok(self
            .variables
            .iter()
            .find(|v| v.id == variable_id && v.empresa_id == empresa_id)
            .cloned())
    }

    async fn list_variable_periods(
        &self,
        variable_id: &str,
    ) -> Result<Vec<VariablePeriod>, StoreError> {
        self.check()?;
        Ok(self
            .periods
            .iter()
            .filter(|p| p.variable_id == variable_id)
            .cloned()
            .collect())
    }

    async fn find_calculation(
        &self,
        empresa_id: &str,
        calculation_id: &str,
    ) -> Result<Option<Calculation>, StoreError> {
        self.check()?;
        Ok(self
            .calculations
            .iter()
            .find(|c| c.id == calculation_id && c.empresa_id == empresa_id)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Lead created at noon on the given day of January 2024.
pub fn lead(id: &str, value: f64, status: &str, sold_value: Option<f64>, day: u32) -> Lead {
    Lead {
        id: id.to_string(),
        empresa_id: String::new(),
        value,
        status: status.to_string(),
        sold_value,
        created_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
    }
}

pub fn shared_dashboard(id: &str, empresa_id: &str, token: &str) -> Dashboard {
    Dashboard {
        id: id.to_string(),
        name: "Painel Comercial".to_string(),
        description: Some("Resultados do mês".to_string()),
        empresa_id: empresa_id.to_string(),
        share_period_start: Some(date(2024, 1, 1)),
        share_period_end: Some(date(2024, 1, 31)),
        share_active: true,
        share_token: Some(token.to_string()),
    }
}

pub fn widget(id: &str, dashboard_id: &str, metric_key: &str, x: i32, y: i32) -> Widget {
    Widget {
        id: id.to_string(),
        dashboard_id: dashboard_id.to_string(),
        widget_type: "card".to_string(),
        metric_key: metric_key.to_string(),
        title: id.to_uppercase(),
        config: serde_json::json!({ "color": "blue" }),
        position: WidgetPosition { x, y },
        size: WidgetSize {
            width: 2,
            height: 1,
        },
    }
}

pub fn static_variable(id: &str, empresa_id: &str, value: f64, format: MetricFormat) -> Variable {
    Variable {
        id: id.to_string(),
        empresa_id: empresa_id.to_string(),
        name: format!("Variável {id}"),
        description: None,
        value_type: VariableValueType::Static,
        value,
        format,
    }
}

pub fn periodic_variable(id: &str, empresa_id: &str, format: MetricFormat) -> Variable {
    Variable {
        value_type: VariableValueType::Periodic,
        value: 0.0,
        ..static_variable(id, empresa_id, 0.0, format)
    }
}

pub fn calculation(id: &str, empresa_id: &str, formula: FormulaNode, format: MetricFormat) -> Calculation {
    Calculation {
        id: id.to_string(),
        empresa_id: empresa_id.to_string(),
        name: format!("Cálculo {id}"),
        description: None,
        formula,
        result_format: format,
    }
}
