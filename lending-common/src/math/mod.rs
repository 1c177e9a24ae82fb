mod rounding_mode;
mod units;

pub use rounding_mode::*;
pub use units::*;
