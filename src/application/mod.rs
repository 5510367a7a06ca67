pub mod features;
pub mod forecasting;
pub mod pipeline;
pub mod strategies;
pub mod training;
