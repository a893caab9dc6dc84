mod connection;
mod migrations;
mod queries;
pub mod seed;

pub use connection::Database;
pub use queries::SortOrder;
pub use seed::seed_mock_data;
