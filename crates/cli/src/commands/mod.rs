pub mod migrate;
pub mod new;
pub mod plan;
pub mod status;
pub mod verify;
