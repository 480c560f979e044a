mod env;
mod global_state;
mod response;
mod routes;
mod utils;

pub use routes::copilot_routes;

pub use env::{CopilotEnv, CopilotMode};
pub use global_state::GlobalState;
pub use utils::setup_tracing;
pub use response::AppError;
