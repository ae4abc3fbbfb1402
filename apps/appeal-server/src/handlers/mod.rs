pub mod appeals;
pub mod health;
