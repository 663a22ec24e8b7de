//! CLI commands for atlas.
//!
//! This module provides CLI commands for atlas, organized into:
//! - **Search commands**: suggest, open (querying the catalog)
//! - **Catalog commands**: fetch, generate (producing and caching catalogs)
//! - **Utility commands**: init (scaffolding configuration)

// Search commands
pub mod open;
pub mod suggest;

// Catalog commands
pub mod fetch;
pub mod generate;

// Utility commands
pub mod init;

pub use fetch::FetchCommand;
pub use generate::GenerateCommand;
pub use init::InitCommand;
pub use open::OpenCommand;
pub use suggest::SuggestCommand;
