//! CLI-owned configuration: flag overrides on top of the shared config
//! file and environment, translated to `icinga2_api::ClientConfig`.

use icinga2_api::ClientConfig;
use icinga2_config::ApiSection;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Settings given on the command line. Unset flags leave the file and
/// environment values alone.
fn flag_overrides(global: &GlobalOpts) -> ApiSection {
    ApiSection {
        url: global.url.clone(),
        username: global.username.clone(),
        password: global.password.clone(),
        certificate: global.certificate.clone(),
        key: global.key.clone(),
        ca_certificate: global.ca_certificate.clone(),
        timeout: global.timeout,
    }
}

/// Resolve the effective `[api]` settings: file, then environment, then flags.
pub fn effective(global: &GlobalOpts) -> Result<ApiSection, CliError> {
    let from_file = icinga2_config::load(global.config.as_deref())?;
    Ok(from_file.merge(flag_overrides(global)))
}

/// Build a validated `ClientConfig` from every configuration layer.
pub fn resolve(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let section = effective(global)?;
    tracing::debug!(?section, "resolved connection settings");
    Ok(section.to_client_config()?)
}
