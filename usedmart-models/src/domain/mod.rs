#[allow(clippy::needless_update)]
mod auth;
#[allow(clippy::needless_update)]
mod category;
mod common;
#[allow(clippy::needless_update)]
mod favorite;
#[allow(clippy::needless_update)]
mod message;
#[allow(clippy::needless_update)]
mod order;
#[allow(clippy::needless_update)]
mod permission;
pub mod prelude;
#[allow(clippy::needless_update)]
mod product;
#[allow(clippy::needless_update)]
mod profile;
#[allow(clippy::needless_update)]
mod role;
#[allow(clippy::needless_update)]
mod settings;
mod stats;
