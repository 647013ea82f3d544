pub mod http_client_factory;
pub mod llm;

pub use http_client_factory::HttpClientFactory;
pub use llm::OpenAiCompatibleProvider;
