use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};

use crate::{
    application::usecases::register_instance::RegisterInstanceRequest,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags, map_error},
        mappers::map_instance,
        requests::InstanceRequestDto,
        responses::InstanceDto,
    },
};

#[derive(Clone)]
pub struct InstancesEndpoints {
    state: Arc<ApiState>,
}

impl InstancesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl InstancesEndpoints {
    #[oai(path = "/instances", method = "get", tag = EndpointsTags::Instances)]
    pub async fn list_instances(&self) -> PoemResult<Json<Vec<InstanceDto>>> {
        let instances = self
            .state
            .list_instances_usecase
            .execute()
            .await
            .map_err(map_error)?;

        Ok(Json(instances.iter().map(map_instance).collect()))
    }

    #[oai(path = "/instances", method = "put", tag = EndpointsTags::Instances)]
    pub async fn register_instance(
        &self,
        request: Json<InstanceRequestDto>,
    ) -> PoemResult<Json<InstanceDto>> {
        let request = request.0;
        let instance = self
            .state
            .register_instance_usecase
            .execute(RegisterInstanceRequest {
                id: request.id,
                name: request.name,
                broker_id: request.broker_id,
                status: request.status.into(),
                phone: request.phone,
            })
            .await
            .map_err(map_error)?;

        Ok(Json(map_instance(&instance)))
    }
}
