use mongodb::Client;
use std::env;

pub const DEFAULT_CONNECTION_STRING: &str = "mongodb://localhost:27017/";

/// Connection string offered as the prompt default. `MONGODB_URI` wins over
/// the built-in localhost address when it is set and non-empty.
pub fn default_uri() -> String {
    env::var("MONGODB_URI")
        .ok()
        .filter(|uri| !uri.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONNECTION_STRING.to_string())
}

pub async fn connect(uri: &str) -> Result<Client, mongodb::error::Error> {
    tracing::debug!(uri, "connecting to MongoDB");
    Client::with_uri_str(uri).await
}
