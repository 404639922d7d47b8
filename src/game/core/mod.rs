pub mod catalog;
pub mod choice;
pub mod clock;
pub mod messages;
pub mod random;
pub mod rules;
pub mod session;
pub mod snapshot;
