//! Configuration management
//!
//! Chain parameters are explicit values handed to `Blockchain::new`, never
//! module-wide state, so independent chains can run side by side in tests.

pub mod settings;

pub use settings::ChainConfig;
