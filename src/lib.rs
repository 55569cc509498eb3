pub mod assets;
pub mod config;
pub mod errors;
pub mod filter;
pub mod text;
pub mod uploader;

pub use assets::{collect_directory_assets, FileEntry};
pub use config::{FieldValue, UploaderConfig};
pub use errors::{AppError, AppResult};
pub use filter::FileFilter;
pub use uploader::{
    LogReporter, ProgressReporter, ReceiverClient, RetryLedger, RunResult, UploadOrchestrator,
    UploadTransport,
};
