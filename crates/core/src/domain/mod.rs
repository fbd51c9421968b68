pub mod client;
pub mod price;
pub mod quotation;
