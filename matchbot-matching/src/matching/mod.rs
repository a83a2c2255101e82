pub mod decision;
pub mod filter;
pub mod locks;
pub mod scoring;
