pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod shifts;
pub mod state;
pub mod stats;
pub mod storage;
pub mod tickets;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{ensure_parent_dir, load_data};
pub use tickets::{count_tickets, is_valid_range};
