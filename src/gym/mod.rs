pub mod recycling_robot;

pub use recycling_robot::{BatteryLevel, RecyclingRobot, RecyclingRobotConfig, RobotAction};
