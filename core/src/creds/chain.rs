//! Role-assumption chain
//!
//! Turns one vended credential into a chain of progressively more restricted
//! credentials. Each hop uses the previous hop's credential as its calling
//! identity, so hops run strictly in order and the first failure ends the
//! chain.

use tracing::info;

use super::Credential;
use crate::client::CredentialClient;
use crate::error::{ApiError, Result};
use crate::platform::RoleAssumer;

/// Retrieve credentials for `role`, then assume each role in `assume_chain` in order
///
/// The returned credential is the last hop's; its role ARN is the last role
/// assumed. A failing hop aborts the chain with an error naming that role.
pub fn get_credentials_chained<C, S>(
    client: &C,
    assumer: &dyn RoleAssumer,
    role: &str,
    no_ip_restrict: bool,
    assume_chain: &[S],
) -> Result<Credential>
where
    C: CredentialClient + ?Sized,
    S: AsRef<str>,
{
    let base = client.get_role_credentials(role, no_ip_restrict)?;

    assume_chain
        .iter()
        .map(AsRef::<str>::as_ref)
        .enumerate()
        .try_fold(base, |current, (hop, arn)| -> Result<Credential> {
            info!(hop = hop + 1, role_arn = arn, "assuming role");
            let next = assumer
                .assume_role(&current, arn)
                .map_err(|e| ApiError::role_assumption(arn, e))?;

            if next.role_arn().is_empty() {
                Ok(next.with_role_arn(arn))
            } else {
                Ok(next)
            }
        })
}
