pub mod pipeline_service;
pub mod rag_service;
