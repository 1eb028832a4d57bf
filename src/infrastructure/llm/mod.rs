mod echo_engine;
mod ollama_client;

pub use echo_engine::{ECHO_MODEL, EchoInferenceEngine};
pub use ollama_client::{OllamaClient, create_ollama_client};
