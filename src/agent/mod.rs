pub mod prompt;
pub mod provider;
