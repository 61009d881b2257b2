pub mod calendar;
pub mod features;
pub mod model;
