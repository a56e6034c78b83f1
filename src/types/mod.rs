pub mod outline;
pub mod report;
pub mod task;

pub use outline::{ReportOutline, Section};
pub use report::{AssembledReport, EvidenceBundle, GeneratedSection};
pub use task::{TaskPlan, WritingTask};
