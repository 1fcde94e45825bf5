pub mod backup;
pub mod git;
pub mod github;
pub mod http;
pub mod progress;
pub mod runtime;
