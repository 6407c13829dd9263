//! Discovery operations
//!
//! Role listing, typeahead search, and console URL resolution. Every call is
//! an independent request/response exchange.

mod resources;
mod roles;
mod search;
mod types;

pub use resources::{generic_get, generic_post, get_resource_url};
pub use roles::{roles, roles_extended};
pub use search::{get_accounts, get_roles_in_account};
pub use types::{AccountDetails, AppDetails, RoleApps, RoleDetails, RoleReference, SearchResult};

use crate::client::CredentialClient;
use crate::error::Result;
use crate::platform::{HttpResponse, Method};

/// Build and send a GET with the given query parameters
fn get_with_query<C>(
    client: &C,
    resource: &str,
    api_prefix: &str,
    query: &[(&str, &str)],
) -> Result<HttpResponse>
where
    C: CredentialClient + ?Sized,
{
    let mut request = client.build_request(Method::Get, resource, None, api_prefix)?;
    request.set_query(query);
    client.execute(request)
}
