/// LLM access for GOLD RUSH
///
/// Two seams live here:
///
/// - [`ChatBackend`] is what the proxy server talks to. Providers are picked from
///   configuration (custom endpoint, OpenAI via Rig, or an unconfigured stub).
/// - [`ChatTransport`] is what the chat UI talks to. [`ApiTransport`] goes over
///   HTTP to the proxy; [`DirectTransport`] wraps a backend in-process.
///
/// # Usage
///
/// ```rust,no_run
/// use goldrush::ai::{ApiTransport, ChatTransport};
///
/// # async fn example() -> Result<(), goldrush::ai::ChatError> {
/// let transport = ApiTransport::new("http://127.0.0.1:3000");
/// let report = transport.market_research("宇宙旅行").await?;
/// println!("{}", report.market_size);
/// # Ok(())
/// # }
/// ```
mod client;
mod market;
mod providers;
mod transport;

pub use client::{ChatBackend, ChatError, ChatResult, Conversation, complete_chat, research_market};
pub use market::{
    EMPTY_REPLY, MARKET_RESEARCH_INSTRUCTION, MarketReport, ReportSlot, research_prompt,
    with_market_research,
};
pub use providers::{EndpointBackend, OpenAiBackend, UnconfiguredBackend, backend_from_config};
pub use transport::{
    ApiTransport, ChatRequest, ChatResponse, ChatTransport, DirectTransport, ErrorResponse,
    MarketResearchRequest,
};
