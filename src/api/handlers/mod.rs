pub mod health;
pub mod metrics;
pub mod ready;
pub mod sites;
pub mod suggest;
pub mod templates;
