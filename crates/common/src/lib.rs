mod client;
mod env;
mod json_stream;

pub use client::ModuleClient;
pub use env::{EnvVars, env_or, env_parse_or, env_required};
pub use json_stream::{encode_json_array, JsonArrayDecoder, JsonStreamError};
