mod inference_engine;

pub use inference_engine::{FragmentStream, InferenceEngine, InferenceError};
