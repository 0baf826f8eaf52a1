#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod client;
pub mod error;
pub mod progress_service;

pub use lab_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, ExperimentSummary};
pub use client::{HttpProgressClient, LocalProgressClient, ProgressClient};
pub use error::{CatalogServiceError, ClientError, ProgressServiceError};
pub use progress_service::ProgressService;
