mod gotrue;
mod jwt_service;
mod provider;

pub use gotrue::GoTrueClient;
pub use jwt_service::{Claims, JwtError, JwtService, AUDIENCE};
pub use provider::{AuthError, AuthProvider, MockAuthProvider, SignUpRequest};
