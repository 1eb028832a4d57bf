mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    InferenceProvider, InferenceSettings, LoggingSettings, RelaySettings, ServerSettings, Settings,
};
