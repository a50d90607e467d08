pub mod core;
pub mod widget;
