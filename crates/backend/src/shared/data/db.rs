use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use std::path::Path;

/// Tables read by the public dashboard engine.
///
/// The admin side of the CRM owns these tables; the bootstrap only makes sure
/// they exist so a fresh database can serve requests.
const SCHEMA: &[(&str, &str)] = &[
    (
        "d402_dashboard",
        r#"
        CREATE TABLE IF NOT EXISTS d402_dashboard (
            id TEXT PRIMARY KEY NOT NULL,
            empresa_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            share_period_start TEXT,
            share_period_end TEXT,
            share_active INTEGER NOT NULL DEFAULT 0,
            share_token TEXT
        );
        "#,
    ),
    (
        "d402_widget",
        r#"
        CREATE TABLE IF NOT EXISTS d402_widget (
            id TEXT PRIMARY KEY NOT NULL,
            dashboard_id TEXT NOT NULL,
            widget_type TEXT NOT NULL DEFAULT 'card',
            metric_key TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            config_json TEXT NOT NULL DEFAULT '{}',
            position_x INTEGER NOT NULL DEFAULT 0,
            position_y INTEGER NOT NULL DEFAULT 0,
            width INTEGER NOT NULL DEFAULT 1,
            height INTEGER NOT NULL DEFAULT 1
        );
        "#,
    ),
    (
        "d402_variable",
        r#"
        CREATE TABLE IF NOT EXISTS d402_variable (
            id TEXT PRIMARY KEY NOT NULL,
            empresa_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            value_type TEXT NOT NULL DEFAULT 'static',
            value REAL NOT NULL DEFAULT 0,
            format TEXT NOT NULL DEFAULT 'number'
        );
        "#,
    ),
    (
        "d402_variable_period",
        r#"
        CREATE TABLE IF NOT EXISTS d402_variable_period (
            id TEXT PRIMARY KEY NOT NULL,
            variable_id TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            value REAL NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "d402_calculation",
        r#"
        CREATE TABLE IF NOT EXISTS d402_calculation (
            id TEXT PRIMARY KEY NOT NULL,
            empresa_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            formula_json TEXT NOT NULL DEFAULT '{}',
            result_format TEXT NOT NULL DEFAULT 'number'
        );
        "#,
    ),
    (
        "d402_lead",
        r#"
        CREATE TABLE IF NOT EXISTS d402_lead (
            id TEXT PRIMARY KEY NOT NULL,
            empresa_id TEXT NOT NULL,
            value REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT '',
            sold_value REAL,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "d402_lead_custom_field_value",
        r#"
        CREATE TABLE IF NOT EXISTS d402_lead_custom_field_value (
            id TEXT PRIMARY KEY NOT NULL,
            lead_id TEXT NOT NULL,
            field_id TEXT NOT NULL,
            value TEXT
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_d402_dashboard_token ON d402_dashboard (share_token);",
    "CREATE INDEX IF NOT EXISTS idx_d402_widget_dashboard ON d402_widget (dashboard_id);",
    "CREATE INDEX IF NOT EXISTS idx_d402_variable_period_var ON d402_variable_period (variable_id);",
    "CREATE INDEX IF NOT EXISTS idx_d402_lead_tenant_created ON d402_lead (empresa_id, created_at);",
    "CREATE INDEX IF NOT EXISTS idx_d402_lead_cf_lead ON d402_lead_custom_field_value (lead_id);",
];

/// Open (and create if needed) the SQLite database file.
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Connecting to database {}", absolute_path.display());
    let conn = Database::connect(&db_url).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

/// Create the dashboard tables and indexes when missing.
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> Result<(), DbErr> {
    for (table, sql) in SCHEMA {
        tracing::debug!("Ensuring table {}", table);
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    for sql in INDEXES {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}
