pub mod forecast_calculator;
pub mod forecast_model;
pub mod forecast_service;
pub mod forecast_traits;

pub use forecast_calculator::project;
pub use forecast_model::{ForecastCategory, ForecastLineItem, MonthlyForecastBucket};
pub use forecast_service::ForecastService;
pub use forecast_traits::ForecastServiceTrait;
