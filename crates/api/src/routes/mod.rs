mod copilot;

pub use copilot::copilot_routes;
