pub mod request;
pub mod response;
pub mod study_package_dto;

pub use response::{ErrorKind, SessionOutput, SessionReply, SessionSnapshot};
pub use study_package_dto::StudyPackageDto;
