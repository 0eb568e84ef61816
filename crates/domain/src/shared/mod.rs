pub mod entity;
pub mod sys;
