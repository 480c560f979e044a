mod consts;

#[cfg(feature = "embeder")]
mod embeder;
#[cfg(feature = "llm")]
mod llm;
#[cfg(any(feature = "llm", feature = "embeder"))]
mod openai;

#[cfg(feature = "embeder")]
pub use embeder::EmbederClient;
#[cfg(feature = "llm")]
pub use llm::{LlmClient, TextStream};

pub use consts::*;
