pub mod delete;
pub mod dispatch;
pub mod export;
pub mod grade;
pub mod list;
pub mod overview;
pub mod rubric;
pub mod show;
