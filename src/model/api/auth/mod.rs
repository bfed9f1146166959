mod token;

pub use token::{CallerToken, CALLER_TOKEN_COOKIE};
