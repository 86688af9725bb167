pub mod analysis;
pub mod harness;
pub mod memory;
pub mod report;
