// src/application/ports/mod.rs
pub mod render;
pub mod security;
pub mod time;

// Aliases used at injection sites
pub type AuthenticatorPort = dyn security::Authenticator;
pub type ClockPort = dyn time::Clock;
pub type RenderTargetPort = dyn render::RenderTarget;
