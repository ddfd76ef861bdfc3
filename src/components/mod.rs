pub mod app;
pub mod legend;
pub mod timeline_chart;
