pub mod clock;
pub mod reorder;
pub mod summary;
pub mod task_ops;
