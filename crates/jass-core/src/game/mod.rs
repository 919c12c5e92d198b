pub mod observation;
pub mod sim;
