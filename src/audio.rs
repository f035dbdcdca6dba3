//! `rodio` implementation of the engine's audio primitive.

mod element;
mod sink;

pub use element::RodioElement;

#[cfg(test)]
mod tests;
