use contracts::dashboards::d402_shared_dashboard::{FormulaNode, WidgetResult};
use futures::future::BoxFuture;
use futures::FutureExt;

use super::context::MetricContext;
use super::custom_fields::custom_field_count;
use super::error::ShareError;
use super::metrics::metric_value;
use super::variables::variable_value;

/// Evaluate a formula tree to a finite number.
///
/// Malformed nodes, unknown references and division by zero all give 0.
/// Only data-store failures are errors.
pub async fn resolve_formula(ctx: &MetricContext<'_>, node: &FormulaNode) -> Result<f64, ShareError> {
    resolve_node(ctx, node).await
}

fn resolve_node<'a>(
    ctx: &'a MetricContext<'a>,
    node: &'a FormulaNode,
) -> BoxFuture<'a, Result<f64, ShareError>> {
    async move {
        let value = match node {
            FormulaNode::Constant { value } => *value,
            FormulaNode::Variable { variable_id } => variable_value(ctx, variable_id)
                .await?
                .map_or(0.0, |(_, value)| value),
            FormulaNode::Metric { metric_key } => metric_value(metric_key, ctx.stats),
            FormulaNode::CustomField { custom_field_id } => {
                custom_field_count(ctx, custom_field_id).await? as f64
            }
            FormulaNode::Operation {
                operator: Some(operator),
                left: Some(left),
                right: Some(right),
            } => {
                let (l, r) = futures::try_join!(
                    resolve_node(ctx, left),
                    resolve_node(ctx, right)
                )?;
                operator.apply(l, r)
            }
            FormulaNode::Operation { .. } | FormulaNode::Invalid => 0.0,
        };

        Ok(if value.is_finite() { value } else { 0.0 })
    }
    .boxed()
}

/// Evaluate a calculation and render it with its own result format.
pub async fn resolve_calculation(
    ctx: &MetricContext<'_>,
    calculation_id: &str,
) -> Result<WidgetResult, ShareError> {
    let calculation = ctx
        .store
        .find_calculation(ctx.empresa_id, calculation_id)
        .await?
        .ok_or_else(|| ShareError::CalculationNotFound(calculation_id.to_string()))?;

    let value = resolve_formula(ctx, &calculation.formula).await?;
    Ok(WidgetResult::new(
        value,
        ctx.locale.format_calculation(value, calculation.result_format),
        calculation.name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d402_shared_dashboard::lead_stats::LeadStatistics;
    use crate::dashboards::d402_shared_dashboard::testing::{
        calculation, date, lead, periodic_variable, static_variable, MemoryShareStore,
    };
    use crate::shared::format::LocaleFormat;
    use contracts::dashboards::d402_shared_dashboard::{MetricFormat, Operator, SharePeriod};

    fn stats() -> LeadStatistics {
        LeadStatistics {
            total: 10,
            active: 6,
            sold: 3,
            lost: 1,
            total_value: 1000.0,
            sold_value: 450.0,
            avg_value: 100.0,
            conversion_rate: 0.3,
        }
    }

    fn period() -> SharePeriod {
        SharePeriod::new(date(2024, 1, 1), date(2024, 1, 31))
    }

    async fn eval(store: &MemoryShareStore, node: &FormulaNode) -> Result<f64, ShareError> {
        let stats = stats();
        let locale = LocaleFormat::default();
        let ctx = MetricContext {
            store,
            empresa_id: "e1",
            period: period(),
            stats: &stats,
            locale: &locale,
        };
        resolve_formula(&ctx, node).await
    }

    fn op(operator: Operator, left: FormulaNode, right: FormulaNode) -> FormulaNode {
        FormulaNode::operation(operator, left, right)
    }

    #[tokio::test]
    async fn test_leaves() {
        let store = MemoryShareStore::default()
            .with_variable(static_variable("meta", "e1", 900.0, MetricFormat::Currency))
            .with_lead("e1", lead("l1", 0.0, "novo", None, 2))
            .with_custom_field("l1", "origem", Some("site"));

        assert_eq!(eval(&store, &FormulaNode::constant(7.5)).await.unwrap(), 7.5);
        assert_eq!(eval(&store, &FormulaNode::variable("meta")).await.unwrap(), 900.0);
        assert_eq!(
            eval(&store, &FormulaNode::metric("sales_total_value")).await.unwrap(),
            450.0
        );
        assert_eq!(eval(&store, &FormulaNode::custom_field("origem")).await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_nested_arithmetic() {
        let store = MemoryShareStore::default()
            .with_variable(periodic_variable("meta", "e1", MetricFormat::Currency))
            .with_period("meta", date(2024, 1, 1), date(2024, 1, 31), 600.0);

        // (sales_total_value - 150) / meta * 100
        let node = op(
            Operator::Multiply,
            op(
                Operator::Divide,
                op(
                    Operator::Subtract,
                    FormulaNode::metric("sales_total_value"),
                    FormulaNode::constant(150.0),
                ),
                FormulaNode::variable("meta"),
            ),
            FormulaNode::constant(100.0),
        );
        assert_eq!(eval(&store, &node).await.unwrap(), 50.0);
    }

    #[tokio::test]
    async fn test_division_by_zero_is_zero() {
        let store = MemoryShareStore::default();
        for left in [0.0, 1.0, -42.0, 1e300] {
            let node = op(
                Operator::Divide,
                FormulaNode::constant(left),
                FormulaNode::constant(0.0),
            );
            assert_eq!(eval(&store, &node).await.unwrap(), 0.0);
        }
        let node = op(
            Operator::Divide,
            FormulaNode::metric("leads_total"),
            FormulaNode::variable("missing"),
        );
        assert_eq!(eval(&store, &node).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_malformed_nodes_are_zero() {
        let store = MemoryShareStore::default();
        let missing_right = FormulaNode::Operation {
            operator: Some(Operator::Add),
            left: Some(Box::new(FormulaNode::constant(5.0))),
            right: None,
        };
        let missing_operator = FormulaNode::Operation {
            operator: None,
            left: Some(Box::new(FormulaNode::constant(5.0))),
            right: Some(Box::new(FormulaNode::constant(5.0))),
        };
        assert_eq!(eval(&store, &missing_right).await.unwrap(), 0.0);
        assert_eq!(eval(&store, &missing_operator).await.unwrap(), 0.0);
        assert_eq!(eval(&store, &FormulaNode::Invalid).await.unwrap(), 0.0);

        let node = op(Operator::Add, FormulaNode::Invalid, FormulaNode::constant(3.0));
        assert_eq!(eval(&store, &node).await.unwrap(), 3.0);
        let node = op(Operator::Add, FormulaNode::metric("nao_existe"), FormulaNode::custom_field("x"));
        assert_eq!(eval(&store, &node).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_overflow_collapses_to_zero() {
        let store = MemoryShareStore::default();
        let node = op(
            Operator::Multiply,
            FormulaNode::constant(1e300),
            FormulaNode::constant(1e300),
        );
        assert_eq!(eval(&store, &node).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_deeply_nested_formula_evaluates() {
        let store = MemoryShareStore::default();
        let mut node = FormulaNode::constant(1.0);
        for _ in 0..200 {
            node = op(Operator::Add, node, FormulaNode::constant(1.0));
        }
        assert_eq!(eval(&store, &node).await.unwrap(), 201.0);
    }

    #[tokio::test]
    async fn test_unknown_operator_and_string_constant_are_zero() {
        let store = MemoryShareStore::default();
        let times = FormulaNode::from(serde_json::json!({
            "type": "operation",
            "operator": "x",
            "left": { "type": "constant", "value": 3 },
            "right": { "type": "constant", "value": 4 }
        }));
        assert_eq!(eval(&store, &times).await.unwrap(), 0.0);

        let text = FormulaNode::from(serde_json::json!({"type": "constant", "value": "2.5"}));
        assert_eq!(eval(&store, &text).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_resolve_calculation_formats_result() {
        let store = MemoryShareStore::default()
            .with_calculation(calculation(
                "ticket",
                "e1",
                op(
                    Operator::Divide,
                    FormulaNode::metric("leads_total_value"),
                    FormulaNode::constant(3.0),
                ),
                MetricFormat::Number,
            ))
            .with_calculation(calculation(
                "conv",
                "e1",
                op(
                    Operator::Divide,
                    FormulaNode::metric("sales_total"),
                    FormulaNode::metric("leads_total"),
                ),
                MetricFormat::Percentage,
            ));
        let stats = stats();
        let locale = LocaleFormat::default();
        let ctx = MetricContext {
            store: &store,
            empresa_id: "e1",
            period: period(),
            stats: &stats,
            locale: &locale,
        };

        let ticket = resolve_calculation(&ctx, "ticket").await.unwrap();
        assert_eq!(ticket.formatted, "333,33");
        assert_eq!(ticket.subtitle, "Cálculo ticket");

        let conv = resolve_calculation(&ctx, "conv").await.unwrap();
        assert_eq!(conv.value, 0.3);
        assert_eq!(conv.formatted, "30.0%");

        let err = resolve_calculation(&ctx, "missing").await.unwrap_err();
        assert!(matches!(err, ShareError::CalculationNotFound(_)));
    }
}
