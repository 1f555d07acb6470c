pub mod aerodynamics;
pub mod environment;
pub mod units;
pub mod wind;

pub use aerodynamics::DragBody;
pub use environment::Environment;
pub use wind::LogWindProfile;
