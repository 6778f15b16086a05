pub mod brief;
pub mod brief_assembler;
pub mod chunk_planner;
pub mod huggingface;
pub mod length_policy;
pub mod llm_provider;
pub mod pdf;
pub mod summarizer;
