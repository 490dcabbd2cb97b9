pub mod bits;
pub mod jobs;

pub use bits::BitService;
pub use jobs::JobService;
