pub mod builders;
pub mod fake_runner;
pub mod observer;
