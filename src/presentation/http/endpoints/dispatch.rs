use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};

use crate::{
    application::usecases::run_dispatch::{ConfigurationSelector, RunDispatchRequest},
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags, map_error},
        mappers::{map_result, map_row},
        requests::DispatchRunRequestDto,
        responses::DispatchResultDto,
    },
};

#[derive(Clone)]
pub struct DispatchEndpoints {
    state: Arc<ApiState>,
}

impl DispatchEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl DispatchEndpoints {
    /// Runs a bulk dispatch. A successful response may still carry per-row
    /// failures in `errors`.
    #[oai(path = "/dispatch/runs", method = "post", tag = EndpointsTags::Dispatch)]
    pub async fn run_dispatch(
        &self,
        request: Json<DispatchRunRequestDto>,
    ) -> PoemResult<Json<DispatchResultDto>> {
        let request = request.0;
        let configuration = match (request.configuration_id, request.use_active_configuration) {
            (Some(id), _) => ConfigurationSelector::Explicit(id),
            (None, true) => ConfigurationSelector::Active,
            (None, false) => ConfigurationSelector::Unconfigured,
        };

        let result = self
            .state
            .run_dispatch_usecase
            .execute(RunDispatchRequest {
                configuration,
                rows: request.rows.into_iter().map(map_row).collect(),
                message_template: request.message_template,
            })
            .await
            .map_err(map_error)?;

        Ok(Json(map_result(&result)))
    }
}
