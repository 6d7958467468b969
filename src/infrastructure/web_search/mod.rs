//! Web search provider implementations

mod tavily;

pub use tavily::{TavilySearchProvider, DEFAULT_TAVILY_BASE_URL};
