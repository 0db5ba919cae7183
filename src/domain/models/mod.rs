pub mod chat;
pub mod configuration;
pub mod dispatch;
pub mod instance;
pub mod schedule;

pub use chat::Chat;
pub use configuration::{AssignmentStrategy, DispatchConfiguration};
pub use dispatch::{DispatchFailure, DispatchResult, DispatchRow};
pub use instance::{InstanceStatus, MessagingInstance};
pub use schedule::{DayOfWeek, TimeWindow, TimeWindows};
