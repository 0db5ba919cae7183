use crate::{
    application::{services::validation::ConfigurationValidation, usecases::ConfigurationDraft},
    domain::models::{
        DayOfWeek, DispatchConfiguration, DispatchFailure, DispatchResult, DispatchRow,
        MessagingInstance, TimeWindow, TimeWindows,
    },
    presentation::{
        http::{
            requests::{ConfigurationRequestDto, DispatchRowDto},
            responses::{
                ConfigurationDto, DispatchFailureDto, DispatchResultDto, InstanceDto,
                ValidationReportDto,
            },
        },
        models::{TimeWindowDto, TimeWindowsDto},
    },
};

pub fn map_configuration(configuration: &DispatchConfiguration) -> ConfigurationDto {
    ConfigurationDto {
        id: configuration.id,
        name: configuration.name.clone(),
        assigned_brokers: configuration.assigned_brokers.clone(),
        broker_assignment_strategy: configuration.strategy.into(),
        time_windows: configuration.time_windows.as_ref().map(map_time_windows),
        interval_between_messages: configuration.interval_between_messages_ms,
        message_template: configuration.message_template.clone(),
        is_active: configuration.is_active,
        priority: configuration.priority,
        created_at: configuration.created_at.to_rfc3339(),
        updated_at: configuration.updated_at.to_rfc3339(),
    }
}

pub fn map_configuration_request(request: ConfigurationRequestDto) -> ConfigurationDraft {
    ConfigurationDraft {
        name: request.name,
        assigned_brokers: request.assigned_brokers,
        strategy: request.broker_assignment_strategy.into(),
        time_windows: request.time_windows.map(parse_time_windows),
        interval_between_messages_ms: request.interval_between_messages,
        message_template: request.message_template,
        is_active: request.is_active,
        priority: request.priority,
    }
}

pub fn map_validation(report: &ConfigurationValidation) -> ValidationReportDto {
    ValidationReportDto {
        is_valid: report.is_valid,
        errors: report.errors.clone(),
        warnings: report.warnings.clone(),
    }
}

pub fn map_instance(instance: &MessagingInstance) -> InstanceDto {
    InstanceDto {
        id: instance.id,
        name: instance.name.clone(),
        broker_id: instance.broker_id.clone(),
        status: instance.status.into(),
        phone: instance.phone.clone(),
    }
}

pub fn map_row(row: DispatchRowDto) -> DispatchRow {
    DispatchRow {
        name: row.nome,
        phone: row.telefone,
        email: row.email,
    }
}

pub fn map_result(result: &DispatchResult) -> DispatchResultDto {
    DispatchResultDto {
        total_sent: result.total_sent as u64,
        total_errors: result.total_errors as u64,
        errors: result.errors.iter().map(map_failure).collect(),
        duration: result.duration.as_millis() as u64,
        broker_distribution: result
            .broker_distribution
            .iter()
            .map(|(broker, sent)| (broker.clone(), *sent as u64))
            .collect(),
    }
}

fn map_failure(failure: &DispatchFailure) -> DispatchFailureDto {
    DispatchFailureDto {
        broker_id: failure.broker_id.clone(),
        phone: failure.phone.clone(),
        name: failure.name.clone(),
        rows: failure.rows as u64,
        message: failure.message.clone(),
    }
}

fn map_time_windows(windows: &TimeWindows) -> TimeWindowsDto {
    let day = |day: DayOfWeek| {
        windows.get(&day).map(|w| TimeWindowDto {
            start: w.start.clone(),
            end: w.end.clone(),
            enabled: w.enabled,
        })
    };
    TimeWindowsDto {
        monday: day(DayOfWeek::Monday),
        tuesday: day(DayOfWeek::Tuesday),
        wednesday: day(DayOfWeek::Wednesday),
        thursday: day(DayOfWeek::Thursday),
        friday: day(DayOfWeek::Friday),
        saturday: day(DayOfWeek::Saturday),
        sunday: day(DayOfWeek::Sunday),
    }
}

fn parse_time_windows(dto: TimeWindowsDto) -> TimeWindows {
    [
        (DayOfWeek::Monday, dto.monday),
        (DayOfWeek::Tuesday, dto.tuesday),
        (DayOfWeek::Wednesday, dto.wednesday),
        (DayOfWeek::Thursday, dto.thursday),
        (DayOfWeek::Friday, dto.friday),
        (DayOfWeek::Saturday, dto.saturday),
        (DayOfWeek::Sunday, dto.sunday),
    ]
    .into_iter()
    .filter_map(|(day, window)| {
        window.map(|w| {
            (
                day,
                TimeWindow {
                    start: w.start,
                    end: w.end,
                    enabled: w.enabled,
                },
            )
        })
    })
    .collect()
}
