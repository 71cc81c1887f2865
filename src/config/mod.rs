//! Configuration module for Undertekst.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    CaptionSettings, FetchMode, GeneralSettings, HttpSettings, ServerSettings, Settings,
};
