pub mod clock;
pub mod distribution;
pub mod messenger;
pub mod template;
pub mod time_window;
pub mod validation;
