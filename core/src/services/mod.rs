//! Business services containing domain logic and use cases.

pub mod account;
pub mod auth;
pub mod cache;
pub mod clock;
pub mod crypto;
pub mod health;
pub mod session;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use account::{AccountService, AccountServiceConfig};
pub use auth::{AuditSink, AuthEvent, AuthEventKind, AuthGateway, AuthService, TracingAuditSink};
pub use cache::CacheServiceTrait;
pub use clock::{Clock, FixedClock, SystemClock};
pub use crypto::{BcryptPasswordEncoder, PasswordEncoderTrait};
pub use health::DependencyHealthTrait;
pub use session::SessionPinStore;
pub use token::{TokenIssuer, TokenIssuerConfig};
pub use verification::{
    IssuedCode, MailSenderTrait, OtpProviderTrait, PhoneVerificationService, VerificationService,
    VerificationServiceConfig,
};
