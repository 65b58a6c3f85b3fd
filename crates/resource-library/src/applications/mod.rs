//! Access applications: intake, coordinator review and legacy import.

pub mod domain;
pub mod import;
pub mod service;

pub use domain::{Application, ApplicationId, ApplicationRequest, ApplicationStatus};
pub use import::{ImportError, LegacyApplicationImporter};
pub use service::ApplicationService;
