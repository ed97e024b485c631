use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::dashboards::d402_shared_dashboard::{
    ErrorResponse, SharedDashboardRequest, SharedDashboardResponse,
};

use crate::api::AppState;
use crate::dashboards::d402_shared_dashboard::{service, ShareError};

const INTERNAL_ERROR: &str = "Erro interno do servidor";

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShareError::MissingToken | ShareError::InvalidConfiguration(_) => {
                StatusCode::BAD_REQUEST
            }
            ShareError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!("D402 Shared dashboard: request failed: {}", self);
            INTERNAL_ERROR.to_string()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// POST /api/public/dashboard
///
/// The body is read leniently: anything that is not `{"token": "<string>"}`
/// counts as a request without a token.
pub async fn get_shared_dashboard(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SharedDashboardResponse>, ShareError> {
    let request = match serde_json::from_slice::<SharedDashboardRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("D402 Shared dashboard: unreadable body: {}", e);
            SharedDashboardRequest::default()
        }
    };

    let response =
        service::get_shared_dashboard(state.store.as_ref(), &state.locale, request.token.as_deref())
            .await?;

    tracing::info!(
        "D402 Shared dashboard: Returning {} widgets for dashboard {}",
        response.widgets.len(),
        response.dashboard.id
    );
    Ok(Json(response))
}
