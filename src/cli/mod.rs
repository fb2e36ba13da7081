pub mod build;
pub mod inspect;
pub mod validate;
