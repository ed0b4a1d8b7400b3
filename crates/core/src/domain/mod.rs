pub mod panels;
pub mod prediction;
pub mod snapshot;
