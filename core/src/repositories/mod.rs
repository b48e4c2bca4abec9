pub mod account;
pub mod verification_token;

pub use account::AccountRepository;
pub use verification_token::VerificationTokenRepository;

#[cfg(test)]
pub use account::MockAccountRepository;
#[cfg(test)]
pub use verification_token::MockVerificationTokenRepository;
