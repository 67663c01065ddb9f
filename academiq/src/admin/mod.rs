//! Administration: users, teacher requests, enrollments and statistics.

pub mod enrollments;
pub mod models;
pub mod stats;
pub mod teacher_requests;
pub mod users;

pub use enrollments::EnrollmentStore;
pub use models::{
    Enrollment, TeacherApplication, TeacherRequest, TeacherRequestId, TeacherRequestView,
    UserStats,
};
pub use stats::StatsStore;
pub use teacher_requests::TeacherRequestStore;
pub use users::UserAdminStore;
