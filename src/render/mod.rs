/// Cooperative cancellation.
pub mod cancel;
/// Chunked parallel frame rendering into sinks.
pub mod pipeline;
