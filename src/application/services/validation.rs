use std::collections::HashSet;

use serde::Serialize;

use crate::domain::models::{AssignmentStrategy, DispatchConfiguration, TimeWindow};

const MIN_RECOMMENDED_INTERVAL_MS: u64 = 1_000;
const MAX_INTERVAL_MS: u64 = 24 * 60 * 60 * 1_000;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ConfigurationValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Checks a configuration before it is stored or used for a run.
///
/// Errors make the configuration unusable; warnings are advisory.
pub fn validate_configuration(configuration: &DispatchConfiguration) -> ConfigurationValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if configuration.name.trim().is_empty() {
        errors.push("Nome da configuração é obrigatório".to_string());
    }

    if configuration.assigned_brokers.is_empty() {
        errors.push("Nenhum corretor atribuído à configuração".to_string());
    } else {
        let mut seen = HashSet::new();
        for broker in &configuration.assigned_brokers {
            if broker.trim().is_empty() {
                errors.push("Identificador de corretor vazio".to_string());
            } else if !seen.insert(broker.as_str()) {
                warnings.push(format!(
                    "Corretor {broker} atribuído mais de uma vez e receberá mais contatos"
                ));
            }
        }
    }

    if configuration.message_template.trim().is_empty() {
        errors.push("Template de mensagem é obrigatório".to_string());
    }

    if configuration.interval_between_messages_ms > MAX_INTERVAL_MS {
        errors.push("Intervalo entre mensagens não pode passar de 24 horas".to_string());
    } else if configuration.interval_between_messages_ms < MIN_RECOMMENDED_INTERVAL_MS {
        warnings.push(
            "Intervalo entre mensagens menor que 1 segundo pode causar bloqueio do número".to_string(),
        );
    }

    if let Some(windows) = &configuration.time_windows {
        for (day, window) in windows {
            validate_window(day.as_str(), window, &mut errors);
        }
        if !windows.values().any(|w| w.enabled) {
            warnings.push("Nenhum dia habilitado nas janelas de horário".to_string());
        }
    }

    match configuration.strategy {
        AssignmentStrategy::RoundRobin | AssignmentStrategy::Random => {}
        AssignmentStrategy::LeastBusy => warnings
            .push("Estratégia least_busy ainda não definida; será usada round_robin".to_string()),
    }

    ConfigurationValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn validate_window(day: &str, window: &TimeWindow, errors: &mut Vec<String>) {
    let start_ok = is_clock_time(&window.start);
    let end_ok = is_clock_time(&window.end);
    if !start_ok {
        errors.push(format!("Horário de início inválido para {day}: {}", window.start));
    }
    if !end_ok {
        errors.push(format!("Horário de término inválido para {day}: {}", window.end));
    }
    if start_ok && end_ok && window.end < window.start {
        errors.push(format!(
            "Janela de {day} cruza a meia-noite ({} - {}), o que não é suportado",
            window.start, window.end
        ));
    }
}

/// Zero-padded 24h `HH:MM`.
fn is_clock_time(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let hours = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    let minutes = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
    hours < 24 && minutes < 60
}
