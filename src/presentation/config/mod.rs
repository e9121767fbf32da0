mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DownloadSettings, GeminiSettings, LoggingSettings, RenderingSettings, ServerSettings, Settings,
};
