use clap::Args;

use common::owner::OwnerId;

/// Print the owner id fragments for this user are stored under.
#[derive(Args, Debug, Clone)]
pub struct HashOwner {
    /// The user's email
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HashOwnerError {
    #[error("email must not be empty")]
    EmptyEmail,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for HashOwner {
    type Error = HashOwnerError;
    type Output = OwnerId;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if self.email.trim().is_empty() {
            return Err(HashOwnerError::EmptyEmail);
        }
        Ok(OwnerId::from_email(&self.email))
    }
}
