pub mod payhere;
