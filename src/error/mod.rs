use thiserror::Error;

use crate::export::ExportError;
use crate::params::ConfigurationError;
use crate::simulator::IntegrationError;

#[derive(Error, Debug)]
pub enum BreathsolError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
