pub mod cors;
pub mod request_trace;
pub mod security_headers;
pub mod session;
pub mod structured_logger;
pub mod trace_span;

pub use cors::cors_middleware;
pub use request_trace::{RequestTrace, TraceId};
pub use security_headers::SecurityHeaders;
pub use session::SessionGuard;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
