//! CLI command handlers

pub mod ask;
pub mod index;
pub mod search;

pub use ask::handle_ask;
pub use ask::handle_chat;
pub use index::handle_index_build;
pub use index::handle_index_info;
pub use search::handle_search;
