pub mod finalizer;

pub use finalizer::{AudioFinalizer, FfmpegFinalizer, FinalizeError, FinalizeOptions, PassthroughFinalizer};
