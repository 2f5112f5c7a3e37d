pub mod insights;
pub mod panels;
pub mod plot;
pub mod preview;
