pub mod context;
pub mod design;
pub mod evidence;
pub mod outlet;
pub mod plan;
pub mod workflow;
pub mod write;
