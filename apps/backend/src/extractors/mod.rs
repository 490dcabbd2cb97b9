pub mod identity;
pub mod validated_json;

pub use identity::CurrentIdentity;
pub use validated_json::ValidatedJson;
