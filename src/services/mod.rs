pub mod assessment_service;
pub mod publishing_service;
pub mod question_bank;
pub mod status_service;
pub mod wizard_service;
pub mod wizard_session_service;
