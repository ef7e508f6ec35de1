pub mod alignment;
pub mod color;
pub mod error;
pub mod mapper;
pub mod profile;
pub mod renderer;
pub mod report;

#[cfg(test)]
mod tests;
