pub mod calculations;
pub mod forecast;
pub mod rules;

pub use forecast::simulate_forecast;
pub use rules::RecommendationEngine;
