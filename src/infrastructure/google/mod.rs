pub mod credentials;

pub use credentials::{CredentialsError, CredentialsFile, GoogleAuth};
