pub mod dishes;
