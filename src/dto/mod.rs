pub mod assessment_dto;
pub mod question_dto;
pub mod wizard_dto;
