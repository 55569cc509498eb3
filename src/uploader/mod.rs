// Uploader module - batches build artifacts and posts them to the receiver
//
// The orchestrator owns the batching and retry loop; the client and reporter
// are the seams it talks through.

pub mod client;
pub mod orchestrator;
pub mod payload;
pub mod progress;

pub use client::{ReceiverClient, UploadTransport};
pub use orchestrator::{RetryLedger, RunResult, TaskOutcome, UploadOrchestrator, UploadTask};
pub use payload::UploadPayload;
pub use progress::{LogReporter, ProgressReporter};
