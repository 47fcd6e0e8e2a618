pub mod daily;
pub mod economy;
pub mod merge;
pub mod types;
