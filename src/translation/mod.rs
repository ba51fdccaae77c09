// Translation module - framework ↔ Gemini translation and normalization

pub mod request;
pub mod response;
pub mod streaming;

pub use request::{build_request, map_role, translate_message};
pub use response::{extract_usage, normalize_response, synthesize_step, NormalizedResponse};
pub use streaming::{ChunkOutcome, FinalOutcome, StreamNormalizer, StreamState};
