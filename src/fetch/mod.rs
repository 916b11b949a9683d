pub mod batch;
pub mod client;
pub mod discover;
pub mod retrieve;

#[cfg(test)]
mod tests;
