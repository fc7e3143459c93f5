// Service exports
pub mod cache;
pub mod matchmaker;
pub mod text_generation;

pub use cache::{CacheKey, MatchCache};
pub use matchmaker::{Matchmaker, DEFAULT_MAX_PROMPT_CANDIDATES};
pub use text_generation::{
    build_generator, GeminiClient, Generation, GenerationError, GroqClient, Provider,
    ProviderConfig, TextGenerator,
};
