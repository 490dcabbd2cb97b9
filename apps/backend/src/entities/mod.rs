pub mod bits;
pub mod jobs;
