/// Viewer widgets: side panel, top bar and the bar chart.
pub mod chart;
pub mod panels;
