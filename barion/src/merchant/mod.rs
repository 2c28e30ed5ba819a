//! Merchant-level configuration and request building.
//!
//! This module turns loosely-typed caller options into a request object: keys are
//! reconciled case-insensitively ([`field_map`]), immutable fields are guarded
//! ([`guard`]), and merchant defaults are merged in before validation ([`defaults`]).

pub mod config;
pub mod defaults;
pub mod field_map;
pub mod guard;

pub use config::{ClientConfig, Environment, PipelineConfig};
pub use defaults::{MergeMode, MerchantDefaults};
pub use guard::IMMUTABLE_FIELDS;
