pub mod chart;
pub mod debug_log;
