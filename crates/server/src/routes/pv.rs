use axum::extract::{Form, Query, State};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// Only query parameters literally named `pv` select variables.
const PV_PARAM: &str = "pv";

pub const PUT_ACK: &str = "OK";

/// `GET /pvget?pv=<name>&pv=<name>...`
///
/// One `"<name> <type> <value>\n"` line per known name, in request order.
/// Unknown names and other parameters are dropped silently.
pub async fn pvget(
    State(state): State<ServerState>,
    Query(params): Query<Vec<(String, String)>>,
) -> String {
    let names: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == PV_PARAM)
        .map(|(_, name)| name)
        .collect();
    state.store.read(&names).await.iter().map(|r| r.to_line()).collect()
}

/// `POST /pvput` with a form body whose field keys are
/// `"<name> <type> <value>"` descriptors. Field values are ignored.
pub async fn pvput(
    State(state): State<ServerState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<&'static str, ApiError> {
    let descriptors: Vec<String> = fields.into_iter().map(|(key, _)| key).collect();
    state.store.write(&descriptors).await?;
    Ok(PUT_ACK)
}
