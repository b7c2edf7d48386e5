pub mod competitions;
