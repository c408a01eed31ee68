pub mod generation_llm;

pub use generation_llm::OpenAiGenerationAdapter;
