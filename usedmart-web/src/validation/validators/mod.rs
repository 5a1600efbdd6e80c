pub mod duplicate;
