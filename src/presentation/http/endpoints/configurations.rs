use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, param::Path, payload::Json};
use uuid::Uuid;

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags, map_error},
    mappers::{map_configuration, map_configuration_request, map_validation},
    requests::ConfigurationRequestDto,
    responses::{ConfigurationDto, ValidationReportDto},
};

#[derive(Clone)]
pub struct ConfigurationsEndpoints {
    state: Arc<ApiState>,
}

impl ConfigurationsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl ConfigurationsEndpoints {
    #[oai(
        path = "/dispatch/configurations",
        method = "get",
        tag = EndpointsTags::Configurations,
    )]
    pub async fn list_configurations(&self) -> PoemResult<Json<Vec<ConfigurationDto>>> {
        let configurations = self
            .state
            .list_configurations_usecase
            .execute()
            .await
            .map_err(map_error)?;

        Ok(Json(configurations.iter().map(map_configuration).collect()))
    }

    #[oai(
        path = "/dispatch/configurations",
        method = "post",
        tag = EndpointsTags::Configurations,
    )]
    pub async fn create_configuration(
        &self,
        request: Json<ConfigurationRequestDto>,
    ) -> PoemResult<Json<ConfigurationDto>> {
        let configuration = self
            .state
            .create_configuration_usecase
            .execute(map_configuration_request(request.0))
            .await
            .map_err(map_error)?;

        Ok(Json(map_configuration(&configuration)))
    }

    #[oai(
        path = "/dispatch/configurations/validate",
        method = "post",
        tag = EndpointsTags::Configurations,
    )]
    pub async fn validate_configuration(
        &self,
        request: Json<ConfigurationRequestDto>,
    ) -> Json<ValidationReportDto> {
        let report = self
            .state
            .validate_configuration_usecase
            .execute(map_configuration_request(request.0));

        Json(map_validation(&report))
    }

    #[oai(
        path = "/dispatch/configurations/:id",
        method = "get",
        tag = EndpointsTags::Configurations,
    )]
    pub async fn get_configuration(&self, id: Path<Uuid>) -> PoemResult<Json<ConfigurationDto>> {
        let configuration = self
            .state
            .get_configuration_usecase
            .execute(id.0)
            .await
            .map_err(map_error)?;

        Ok(Json(map_configuration(&configuration)))
    }

    #[oai(
        path = "/dispatch/configurations/:id",
        method = "put",
        tag = EndpointsTags::Configurations,
    )]
    pub async fn update_configuration(
        &self,
        id: Path<Uuid>,
        request: Json<ConfigurationRequestDto>,
    ) -> PoemResult<Json<ConfigurationDto>> {
        let configuration = self
            .state
            .update_configuration_usecase
            .execute(id.0, map_configuration_request(request.0))
            .await
            .map_err(map_error)?;

        Ok(Json(map_configuration(&configuration)))
    }

    #[oai(
        path = "/dispatch/configurations/:id",
        method = "delete",
        tag = EndpointsTags::Configurations,
    )]
    pub async fn delete_configuration(&self, id: Path<Uuid>) -> PoemResult<()> {
        self.state
            .delete_configuration_usecase
            .execute(id.0)
            .await
            .map_err(map_error)
    }
}
