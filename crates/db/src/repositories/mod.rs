pub mod auth_session_repo;
pub mod schedule_document_repo;
pub mod user_repo;

pub use auth_session_repo::AuthSessionRepo;
pub use schedule_document_repo::ScheduleDocumentRepo;
pub use user_repo::UserRepo;
