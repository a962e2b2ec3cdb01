mod chart;

pub use chart::ChartRenderer;
