// src/dag/mod.rs

//! Task graph and slot scheduler.

pub mod graph;
pub mod scheduler;
pub mod task;

pub use graph::{GraphBuilder, TaskGraph};
pub use scheduler::SlotScheduler;
pub use task::{ScheduledTask, Task, TaskState};
