pub mod api;
pub mod city;
pub mod config;
pub mod consts;
pub mod error;
pub mod governor;
pub mod model;
pub mod oracle;
pub mod parameter;
pub mod presets;
pub mod types;
pub mod verifier;
// cmd and reports belong to the binary (main.rs).
