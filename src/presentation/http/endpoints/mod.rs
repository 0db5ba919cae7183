pub mod configurations;
pub mod dispatch;
pub mod health;
pub mod instances;
pub mod root;
