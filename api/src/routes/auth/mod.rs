//! Session endpoints
//!
//! - `POST {scope}/login`
//! - `POST {scope}/token/refresh`
//! - `POST {scope}/logout`

pub mod login;
pub mod logout;
pub mod refresh;

pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
