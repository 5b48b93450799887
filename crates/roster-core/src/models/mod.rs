mod from_row;
mod structs;

pub use structs::{MissingField, NewUser, User};
