// src/application/ports/mod.rs
pub mod authorization_code;
pub mod security;
pub mod session;
pub mod time;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type AuthorizationCodeStorePort = dyn authorization_code::AuthorizationCodeStore;
pub type SessionResolverPort = dyn session::SessionResolver;
pub type IdTokenSignerPort = dyn security::IdTokenSigner;
pub type CodeGeneratorPort = dyn security::CodeGenerator;
pub type ClockPort = dyn time::Clock;
