use async_trait::async_trait;
use contracts::dashboards::d402_shared_dashboard::{
    Calculation, CustomFieldValue, Dashboard, FormulaNode, Lead, LeadCustomFields, MetricFormat,
    PeriodWindow, Variable, VariablePeriod, VariableValueType, Widget, WidgetPosition, WidgetSize,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

use super::error::StoreError;
use super::store::ShareStore;

/// SQLite keeps a hard limit on bound parameters per statement.
const IN_CHUNK: usize = 500;

mod dashboard {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "d402_dashboard")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub empresa_id: String,
        pub name: String,
        pub description: Option<String>,
        pub share_period_start: Option<chrono::NaiveDate>,
        pub share_period_end: Option<chrono::NaiveDate>,
        pub share_active: bool,
        pub share_token: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod widget {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "d402_widget")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub dashboard_id: String,
        pub widget_type: String,
        pub metric_key: String,
        pub title: String,
        pub config_json: String,
        pub position_x: i32,
        pub position_y: i32,
        pub width: i32,
        pub height: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod variable {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "d402_variable")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub empresa_id: String,
        pub name: String,
        pub description: Option<String>,
        pub value_type: String,
        pub value: f64,
        pub format: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod variable_period {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "d402_variable_period")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub variable_id: String,
        pub start_date: chrono::NaiveDate,
        pub end_date: chrono::NaiveDate,
        pub value: f64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod calculation {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "d402_calculation")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub empresa_id: String,
        pub name: String,
        pub description: Option<String>,
        pub formula_json: String,
        pub result_format: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod lead {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "d402_lead")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub empresa_id: String,
        pub value: f64,
        pub status: String,
        pub sold_value: Option<f64>,
        pub created_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod lead_custom_field_value {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "d402_lead_custom_field_value")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub lead_id: String,
        pub field_id: String,
        pub value: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<dashboard::Model> for Dashboard {
    fn from(m: dashboard::Model) -> Self {
        Dashboard {
            id: m.id,
            name: m.name,
            description: m.description,
            empresa_id: m.empresa_id,
            share_period_start: m.share_period_start,
            share_period_end: m.share_period_end,
            share_active: m.share_active,
            share_token: m.share_token,
        }
    }
}

impl From<widget::Model> for Widget {
    fn from(m: widget::Model) -> Self {
        let config = serde_json::from_str(&m.config_json).unwrap_or(serde_json::Value::Null);
        Widget {
            id: m.id,
            dashboard_id: m.dashboard_id,
            widget_type: m.widget_type,
            metric_key: m.metric_key,
            title: m.title,
            config,
            position: WidgetPosition {
                x: m.position_x,
                y: m.position_y,
            },
            size: WidgetSize {
                width: m.width,
                height: m.height,
            },
        }
    }
}

impl From<variable::Model> for Variable {
    fn from(m: variable::Model) -> Self {
        Variable {
            id: m.id,
            empresa_id: m.empresa_id,
            name: m.name,
            description: m.description,
            value_type: VariableValueType::from_str_lossy(&m.value_type),
            value: m.value,
            format: MetricFormat::from_str_lossy(&m.format),
        }
    }
}

impl From<variable_period::Model> for VariablePeriod {
    fn from(m: variable_period::Model) -> Self {
        VariablePeriod {
            id: m.id,
            variable_id: m.variable_id,
            start_date: m.start_date,
            end_date: m.end_date,
            value: m.value,
        }
    }
}

impl From<calculation::Model> for Calculation {
    fn from(m: calculation::Model) -> Self {
        Calculation {
            id: m.id,
            empresa_id: m.empresa_id,
            name: m.name,
            description: m.description,
            formula: FormulaNode::from_json_str(&m.formula_json),
            result_format: MetricFormat::from_str_lossy(&m.result_format),
        }
    }
}

impl From<lead::Model> for Lead {
    fn from(m: lead::Model) -> Self {
        Lead {
            id: m.id,
            empresa_id: m.empresa_id,
            value: m.value,
            status: m.status,
            sold_value: m.sold_value,
            created_at: m.created_at,
        }
    }
}

/// `ShareStore` backed by the application's SQLite database.
#[derive(Clone)]
pub struct SeaOrmShareStore {
    db: DatabaseConnection,
}

impl SeaOrmShareStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn lead_models(
        &self,
        empresa_id: &str,
        window: &PeriodWindow,
    ) -> Result<Vec<lead::Model>, StoreError> {
        let models = lead::Entity::find()
            .filter(lead::Column::EmpresaId.eq(empresa_id))
            .filter(lead::Column::CreatedAt.gte(window.from))
            .filter(lead::Column::CreatedAt.lt(window.until))
            .order_by_asc(lead::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models)
    }
}

#[async_trait]
impl ShareStore for SeaOrmShareStore {
    async fn find_dashboards_by_share_token(
        &self,
        token: &str,
    ) -> Result<Vec<Dashboard>, StoreError> {
        let models = dashboard::Entity::find()
            .filter(dashboard::Column::ShareToken.eq(token))
            .filter(dashboard::Column::ShareActive.eq(true))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_widgets(&self, dashboard_id: &str) -> Result<Vec<Widget>, StoreError> {
        let models = widget::Entity::find()
            .filter(widget::Column::DashboardId.eq(dashboard_id))
            .order_by_asc(widget::Column::PositionY)
            .order_by_asc(widget::Column::PositionX)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_leads(
        &self,
        empresa_id: &str,
        window: &PeriodWindow,
    ) -> Result<Vec<Lead>, StoreError> {
        let models = self.lead_models(empresa_id, window).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_lead_custom_fields(
        &self,
        empresa_id: &str,
        window: &PeriodWindow,
    ) -> Result<Vec<LeadCustomFields>, StoreError> {
        let lead_ids: Vec<String> = self
            .lead_models(empresa_id, window)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        let mut by_lead: HashMap<String, Vec<CustomFieldValue>> = HashMap::new();
        for chunk in lead_ids.chunks(IN_CHUNK) {
            let values = lead_custom_field_value::Entity::find()
                .filter(lead_custom_field_value::Column::LeadId.is_in(chunk.to_vec()))
                .all(&self.db)
                .await?;
            for v in values {
                by_lead.entry(v.lead_id).or_default().push(CustomFieldValue {
                    field_id: v.field_id,
                    value: v.value,
                });
            }
        }

        Ok(lead_ids
            .into_iter()
            .map(|lead_id| {
                let values = by_lead.remove(&lead_id).unwrap_or_default();
                LeadCustomFields { lead_id, values }
            })
            .collect())
    }

    async fn find_variable(
        &self,
        empresa_id: &str,
        variable_id: &str,
    ) -> Result<Option<Variable>, StoreError> {
        let model = variable::Entity::find_by_id(variable_id.to_string())
            .filter(variable::Column::EmpresaId.eq(empresa_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_variable_periods(
        &self,
        variable_id: &str,
    ) -> Result<Vec<VariablePeriod>, StoreError> {
        let models = variable_period::Entity::find()
            .filter(variable_period::Column::VariableId.eq(variable_id))
            .order_by_asc(variable_period::Column::StartDate)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_calculation(
        &self,
        empresa_id: &str,
        calculation_id: &str,
    ) -> Result<Option<Calculation>, StoreError> {
        let model = calculation::Entity::find_by_id(calculation_id.to_string())
            .filter(calculation::Column::EmpresaId.eq(empresa_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }
}
