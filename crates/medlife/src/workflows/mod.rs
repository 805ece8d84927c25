pub mod assistant;
pub mod care;
mod http;
pub mod journal;
pub mod reminders;
pub mod screening;
pub mod subjects;

#[cfg(test)]
pub(crate) mod testing;
