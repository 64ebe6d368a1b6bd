//! Identity provider port.

use crate::domain::error::GatewayError;
use crate::domain::user::UserRecord;

pub trait IdentityPort {
    /// Register a new account. Fails with `Auth` if the email is taken.
    fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, GatewayError>;

    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, GatewayError>;

    fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, GatewayError>;

    /// Invalidate every session issued to the user so far.
    fn revoke_tokens(&self, user_id: &str) -> Result<(), GatewayError>;
}
