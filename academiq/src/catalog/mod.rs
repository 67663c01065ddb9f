//! Course catalog: courses and the subjects that group their videos.

pub mod courses;
pub mod models;
pub mod subjects;

pub use courses::CourseStore;
pub use models::{Course, CourseId, NewCourse, NewSubject, Subject, SubjectId};
pub use subjects::SubjectStore;
