mod static_provider;
pub use static_provider::StaticCredentialProvider;

mod connection_string;
pub use connection_string::ConnectionStringCredentialProvider;

mod env;
pub use env::EnvCredentialProvider;
