pub mod assessment;
pub mod caller;
pub mod draft;
pub mod publishing;
pub mod question;
