mod user;

pub use user::{Profile, StudyRoom, User};
