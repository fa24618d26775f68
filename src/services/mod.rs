pub mod backend;
pub mod calendar;
pub mod events;
pub mod lifecycle;
pub mod pricing;
pub mod validation;
