pub mod flinch;
pub mod rolling;
pub mod session;
pub mod shot;

pub use flinch::FlinchDetector;
pub use rolling::RollingWindow;
pub use session::{DrillSession, FusionPolicy, SessionConfig};
pub use shot::ShotDetector;
