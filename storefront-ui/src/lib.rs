pub mod cart;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod interop;
pub mod page;
pub mod storage;
pub mod theme;
pub mod web;
pub mod zoom;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use interop::start;
pub use page::*;
pub use storage::*;
pub use zoom::*;

pub use storefront_types::{Cart, CartItem, Theme};
