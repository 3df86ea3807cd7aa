pub mod health;
pub mod items;
pub mod products;
pub mod reviews;
